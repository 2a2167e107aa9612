// 图书实体
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_of_published: i32,
    pub copies: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 图书可写字段
#[derive(Debug, Clone)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year_of_published: i32,
    pub copies: i32,
}

// 图书馆学生
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryStudent {
    pub id: String,
    pub auth_user_href: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 借阅记录
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub student_id: String,
    pub book_id: String,
    pub date_borrowed: chrono::DateTime<chrono::Utc>,
    pub date_returned: Option<chrono::DateTime<chrono::Utc>>,
    pub fined: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.date_returned.is_none()
    }
}

/// 借书结果
#[derive(Debug, Clone, PartialEq)]
pub enum BorrowOutcome {
    Borrowed(Transaction),
    AlreadyBorrowedByStudent,
    NoCopiesLeft,
}

/// 还书结果
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnOutcome {
    Returned(Transaction),
    NotBorrowed,
    AlreadyReturned,
}
