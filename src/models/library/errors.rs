use crate::define_error_codes;

define_error_codes! {
    /// 图书馆服务错误
    LibraryErrorCode {
        StudentNotFound = (10000, "Given student id is not available."),
        BookNotFound = (10001, "Given book id is not available."),
        BookAlreadyBorrowed = (10002, "Given book is already borrowed please return it before get new."),
        NoCopiesAvailable = (10003, "Given book is already borrowed by everyone please check after few days."),
        BookNotBorrowed = (10004, "Given book is not borrowed by the student."),
        BookAlreadyReturned = (10005, "Given book is already returned."),
        MissingBookDetails = (10006, "please add all the required details for the book."),
        BookAlreadyExists = (10007, "Given book is already available."),
    }
}
