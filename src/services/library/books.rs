use actix_web::{HttpRequest, HttpResponse};
use std::collections::HashSet;
use tracing::info;

use crate::errors::LbuError;
use crate::middlewares::RequireJWT;
use crate::models::library::errors::LibraryErrorCode;
use crate::models::library::requests::BookRequest;
use crate::models::library::responses::{BookDto, BookDtos};
use crate::models::{ApiError, ApiResult};

use super::LibraryService;

fn map_book_conflict(err: LbuError) -> ApiError {
    if err.is_unique_violation() {
        LibraryErrorCode::BookAlreadyExists.into()
    } else {
        err.into()
    }
}

pub async fn create_book(
    service: &LibraryService,
    request: &HttpRequest,
    book: BookRequest,
) -> ApiResult<HttpResponse> {
    let fields = book.into_fields()?;
    let storage = service.get_storage(request)?;

    let created = storage.create_book(fields).await.map_err(map_book_conflict)?;
    info!("created book [{}] {}", created.isbn, created.title);

    Ok(HttpResponse::Ok().json(BookDto::from(created)))
}

pub async fn update_book(
    service: &LibraryService,
    request: &HttpRequest,
    mut book: BookRequest,
) -> ApiResult<HttpResponse> {
    let isbn = book.isbn.take().ok_or(LibraryErrorCode::BookNotFound)?;
    let fields = book.into_fields()?;
    let storage = service.get_storage(request)?;

    let existing = storage
        .get_book_by_isbn(&isbn)
        .await?
        .ok_or(LibraryErrorCode::BookNotFound)?;
    if (fields.copies as u64) < storage.count_open_borrows(&existing.id).await? {
        return Err(LibraryErrorCode::NoCopiesAvailable.into());
    }

    let updated = storage
        .update_book(&isbn, fields)
        .await
        .map_err(map_book_conflict)?
        .ok_or(LibraryErrorCode::BookNotFound)?;
    info!("updated book [{}]", updated.isbn);

    Ok(HttpResponse::Ok().json(BookDto::from(updated)))
}

pub async fn get_book(
    service: &LibraryService,
    request: &HttpRequest,
    isbn: String,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let book = storage
        .get_book_by_isbn(&isbn)
        .await?
        .ok_or(LibraryErrorCode::BookNotFound)?;

    Ok(HttpResponse::Ok().json(BookDto::from(book)))
}

pub async fn list_books(service: &LibraryService, request: &HttpRequest) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    service.trigger_fine_check(request, storage.clone());

    // 调用方当前借着的书
    let mut borrowed = HashSet::new();
    if let Ok(href) = RequireJWT::auth_user_href(request)
        && let Some(student) = storage.get_library_student_by_href(&href).await?
    {
        borrowed = storage
            .list_student_transactions(&student.id)
            .await?
            .into_iter()
            .filter(|(transaction, _)| transaction.is_open())
            .map(|(_, book)| book.id)
            .collect();
    }

    let books = storage
        .list_books()
        .await?
        .into_iter()
        .map(|book| {
            let is_borrowed = borrowed.contains(&book.id);
            BookDto {
                is_borrowed: Some(is_borrowed),
                ..BookDto::from(book)
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(BookDtos { books }))
}
