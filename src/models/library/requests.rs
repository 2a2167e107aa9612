use serde::Deserialize;

use super::entities::BookFields;
use super::errors::LibraryErrorCode;

// 创建 / 更新图书，更新时以 isbn 定位
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year_of_published: Option<i32>,
    pub copies: Option<i32>,
}

impl BookRequest {
    pub fn into_fields(self) -> Result<BookFields, LibraryErrorCode> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let author = self.author.filter(|a| !a.trim().is_empty());
        match (title, author, self.year_of_published, self.copies) {
            (Some(title), Some(author), Some(year_of_published), Some(copies)) if copies >= 0 => {
                Ok(BookFields {
                    title,
                    author,
                    year_of_published,
                    copies,
                })
            }
            _ => Err(LibraryErrorCode::MissingBookDetails),
        }
    }
}
