use actix_web::{HttpRequest, HttpResponse, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::ApiResult;
use crate::models::auth::entities::UserRole;
use crate::models::library::requests::BookRequest;
use crate::services::LibraryService;

static LIBRARY_SERVICE: Lazy<LibraryService> = Lazy::new(LibraryService::new_lazy);

pub async fn create_book(req: HttpRequest, book: web::Json<BookRequest>) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.create_book(&req, book.into_inner()).await
}

pub async fn update_book(req: HttpRequest, book: web::Json<BookRequest>) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.update_book(&req, book.into_inner()).await
}

pub async fn list_books(req: HttpRequest) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.list_books(&req).await
}

pub async fn get_book(req: HttpRequest, isbn: web::Path<String>) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.get_book(&req, isbn.into_inner()).await
}

pub async fn create_student(req: HttpRequest) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.create_student(&req).await
}

pub async fn get_student(req: HttpRequest) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.get_student(&req).await
}

pub async fn borrow_book(req: HttpRequest, isbn: web::Path<String>) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.borrow_book(&req, isbn.into_inner()).await
}

pub async fn return_book(req: HttpRequest, isbn: web::Path<String>) -> ApiResult<HttpResponse> {
    LIBRARY_SERVICE.return_book(&req, isbn.into_inner()).await
}

// 图书的写操作只对管理员开放
pub fn configure_library_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/library")
            .service(
                web::resource("/books")
                    .guard(guard::Any(guard::Post()).or(guard::Put()))
                    .wrap(RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(RequireJWT)
                    .route(web::post().to(create_book))
                    .route(web::put().to(update_book)),
            )
            .service(
                web::scope("")
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .wrap(RequireJWT)
                    .route("/books", web::get().to(list_books))
                    .route("/books/{isbn}", web::get().to(get_book))
                    .service(
                        web::resource("/student")
                            .route(web::post().to(create_student))
                            .route(web::get().to(get_student)),
                    )
                    .route("/student/borrow/{isbn}", web::post().to(borrow_book))
                    .route("/student/return/{isbn}", web::post().to(return_book)),
            ),
    );
}
