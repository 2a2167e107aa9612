use serde::Deserialize;

// 选课请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentRequest {
    pub auth_user_href: Option<String>,
    pub course_href: Option<String>,
}

// 更新学生资料请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub auth_user_href: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub phone_contact: Option<String>,
}

// 查询学生参数
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    pub auth_user_href: Option<String>,
    pub student_id: Option<String>,
}
