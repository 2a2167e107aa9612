use serde::{Deserialize, Serialize};

use super::entities::Student;
use crate::models::auth::responses::JwtTokenDto;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    pub id: String,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub phone_contact: Option<String>,
    pub auth_user_href: String,
    pub created_timestamp: chrono::DateTime<chrono::Utc>,
    pub updated_timestamp: chrono::DateTime<chrono::Utc>,
    pub course_hrefs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jwt_token_dto: Option<JwtTokenDto>,
}

impl From<Student> for StudentDto {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            address: student.address,
            emergency_contact: student.emergency_contact,
            date_of_birth: student.date_of_birth,
            phone_contact: student.phone_contact,
            auth_user_href: student.auth_user_href,
            created_timestamp: student.created_at,
            updated_timestamp: student.updated_at,
            course_hrefs: student.course_hrefs,
            jwt_token_dto: None,
        }
    }
}
