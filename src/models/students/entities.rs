// 学生实体，course_hrefs 来自选课表
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub phone_contact: Option<String>,
    pub auth_user_href: String,
    pub course_hrefs: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生资料更新
#[derive(Debug, Clone)]
pub struct StudentProfile {
    pub address: String,
    pub emergency_contact: String,
    pub date_of_birth: chrono::NaiveDate,
    pub phone_contact: String,
}
