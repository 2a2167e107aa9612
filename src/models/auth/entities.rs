use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,    // 普通用户 (未注册为学生)
    Student, // 学生
    Admin,   // 管理员
}

impl UserRole {
    pub const USER: &'static str = "USER";
    pub const STUDENT: &'static str = "STUDENT";
    pub const ADMIN: &'static str = "ADMIN";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Admin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::User, &Self::Student, &Self::Admin]
    }

    /// JWT `roles` 声明中使用的权限名
    pub fn authority(&self) -> &'static str {
        match self {
            UserRole::User => "ROLE_GENERAL_USER",
            UserRole::Student => "ROLE_STUDENT",
            UserRole::Admin => "ROLE_ADMIN",
        }
    }

    pub fn from_authority(authority: &str) -> Option<Self> {
        match authority {
            "ROLE_GENERAL_USER" => Some(UserRole::User),
            "ROLE_STUDENT" => Some(UserRole::Student),
            "ROLE_ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "{}", UserRole::USER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::USER => Ok(UserRole::User),
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub role: UserRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 其他服务引用该用户时使用的 href
    pub fn href(&self) -> String {
        format!("/auth/user/{}", self.id)
    }
}

// 新建用户所需字段（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

// 用户资料更新，None 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// 账户激活令牌
#[derive(Debug, Clone)]
pub struct ActivationDetails {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
