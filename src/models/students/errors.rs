use crate::define_error_codes;

define_error_codes! {
    /// 学生服务错误
    StudentErrorCode {
        StudentNotFound = (10000, "Given student id is not available."),
        InvalidDetails = (10001, "Invalid course details provided."),
        CourseAlreadyEnrolled = (10002, "Given course is already available."),
        AuthServiceFailed = (7000, "An error occurred in the auth service while upgrading the user."),
        CourseServiceFailed = (7001, "An error occurred in the course service."),
        LibraryServiceFailed = (7002, "An error occurred in the library service."),
        FinanceServiceFailed = (7003, "An error occurred in the finance service."),
    }
}
