use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entities::Course;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id_href: String,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fees: Decimal,
    pub duration_in_days: i32,
    pub instructor: Option<String>,
}

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        Self {
            id_href: course.href(),
            title: course.title,
            description: course.description,
            fees: course.fees,
            duration_in_days: course.duration_in_days,
            instructor: course.instructor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDtos {
    pub courses: Vec<CourseDto>,
}
