use rust_decimal::Decimal;

// 课程实体
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub fees: Decimal,
    pub duration_in_days: i32,
    pub instructor: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn href(&self) -> String {
        format!("/courses/{}", self.id)
    }
}

// 课程可写字段，创建与更新共用
#[derive(Debug, Clone)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub fees: Decimal,
    pub duration_in_days: i32,
    pub instructor: Option<String>,
}
