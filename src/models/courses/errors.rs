use crate::define_error_codes;

define_error_codes! {
    /// 课程服务错误
    CourseErrorCode {
        CourseNotFound = (10000, "Given course id is not available."),
        InvalidCourseDetails = (10001, "Invalid course details provided."),
        CourseAlreadyExists = (10002, "Given course is already available."),
    }
}
