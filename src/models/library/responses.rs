use serde::{Deserialize, Serialize};

use super::entities::{Book, LibraryStudent, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_of_published: i32,
    pub copies: i32,
    pub created_timestamp: chrono::DateTime<chrono::Utc>,
    pub updated_timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_borrowed: Option<bool>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            year_of_published: book.year_of_published,
            copies: book.copies,
            created_timestamp: book.created_at,
            updated_timestamp: book.updated_at,
            is_borrowed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDtos {
    pub books: Vec<BookDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub book: BookDto,
    pub date_borrowed: chrono::DateTime<chrono::Utc>,
    pub date_returned: Option<chrono::DateTime<chrono::Utc>>,
    pub created_timestamp: chrono::DateTime<chrono::Utc>,
    pub updated_timestamp: chrono::DateTime<chrono::Utc>,
}

impl TransactionDto {
    pub fn new(transaction: Transaction, book: Book) -> Self {
        Self {
            book: book.into(),
            date_borrowed: transaction.date_borrowed,
            date_returned: transaction.date_returned,
            created_timestamp: transaction.created_at,
            updated_timestamp: transaction.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStudentDto {
    pub id: String,
    pub auth_user_href: String,
    pub borrowed_books: Vec<TransactionDto>,
    pub created_timestamp: chrono::DateTime<chrono::Utc>,
    pub updated_timestamp: chrono::DateTime<chrono::Utc>,
}

impl LibraryStudentDto {
    pub fn new(student: LibraryStudent, borrowed_books: Vec<TransactionDto>) -> Self {
        Self {
            id: student.id,
            auth_user_href: student.auth_user_href,
            borrowed_books,
            created_timestamp: student.created_at,
            updated_timestamp: student.updated_at,
        }
    }
}
