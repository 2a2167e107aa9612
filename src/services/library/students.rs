use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::library::entities::{BorrowOutcome, LibraryStudent, ReturnOutcome};
use crate::models::library::errors::LibraryErrorCode;
use crate::models::library::responses::{LibraryStudentDto, TransactionDto};
use crate::models::{ApiResult, MessageDto};
use crate::storage::Storage;

use super::LibraryService;

async fn caller_student(
    storage: &dyn Storage,
    request: &HttpRequest,
) -> ApiResult<LibraryStudent> {
    let href = RequireJWT::auth_user_href(request)?;
    Ok(storage
        .get_library_student_by_href(&href)
        .await?
        .ok_or(LibraryErrorCode::StudentNotFound)?)
}

pub async fn create_student(
    service: &LibraryService,
    request: &HttpRequest,
) -> ApiResult<HttpResponse> {
    let href = RequireJWT::auth_user_href(request)?;
    let storage = service.get_storage(request)?;

    let student = storage.create_library_student(&href).await?;
    info!("library student [{}] ready for {}", student.id, href);

    Ok(HttpResponse::Ok().json(MessageDto::ok("Student created")))
}

pub async fn get_student(service: &LibraryService, request: &HttpRequest) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    service.trigger_fine_check(request, storage.clone());

    let student = caller_student(storage.as_ref(), request).await?;
    let borrowed_books = storage
        .list_student_transactions(&student.id)
        .await?
        .into_iter()
        .map(|(transaction, book)| TransactionDto::new(transaction, book))
        .collect();

    Ok(HttpResponse::Ok().json(LibraryStudentDto::new(student, borrowed_books)))
}

pub async fn borrow_book(
    service: &LibraryService,
    request: &HttpRequest,
    isbn: String,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    service.trigger_fine_check(request, storage.clone());

    let student = caller_student(storage.as_ref(), request).await?;
    let book = storage
        .get_book_by_isbn(&isbn)
        .await?
        .ok_or(LibraryErrorCode::BookNotFound)?;

    match storage.borrow_book(&student.id, &book).await? {
        BorrowOutcome::Borrowed(transaction) => {
            info!("student [{}] borrowed [{}] ({})", student.id, isbn, transaction.id);
            Ok(HttpResponse::Ok().json(MessageDto::ok("Book borrowed")))
        }
        BorrowOutcome::AlreadyBorrowedByStudent => {
            Err(LibraryErrorCode::BookAlreadyBorrowed.into())
        }
        BorrowOutcome::NoCopiesLeft => Err(LibraryErrorCode::NoCopiesAvailable.into()),
    }
}

pub async fn return_book(
    service: &LibraryService,
    request: &HttpRequest,
    isbn: String,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    service.trigger_fine_check(request, storage.clone());

    let book = storage
        .get_book_by_isbn(&isbn)
        .await?
        .ok_or(LibraryErrorCode::BookNotFound)?;
    let student = caller_student(storage.as_ref(), request).await?;

    match storage.return_book(&student.id, &book).await? {
        ReturnOutcome::Returned(transaction) => {
            info!("student [{}] returned [{}] ({})", student.id, isbn, transaction.id);
            Ok(HttpResponse::Ok().json(MessageDto::ok("Book returned")))
        }
        ReturnOutcome::NotBorrowed => Err(LibraryErrorCode::BookNotBorrowed.into()),
        ReturnOutcome::AlreadyReturned => Err(LibraryErrorCode::BookAlreadyReturned.into()),
    }
}
