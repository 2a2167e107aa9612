//! 统一错误处理模块
//!
//! 基础设施层错误（数据库、缓存、序列化、服务间调用）。
//! 面向 API 的业务错误码见 `models::common::error_code`。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lbu_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LbuError {
            $($variant(String),)*
        }

        impl LbuError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LbuError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LbuError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LbuError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl LbuError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LbuError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lbu_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Io("E006", "IO Error"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    UniqueViolation("E009", "Unique Constraint Violation"),
    RemoteService("E010", "Remote Service Error"),
    Startup("E011", "Startup Error"),
}

impl LbuError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, LbuError::UniqueViolation(_))
    }
}

impl fmt::Display for LbuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LbuError {}

impl From<sea_orm::DbErr> for LbuError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => {
                LbuError::UniqueViolation(msg)
            }
            _ => LbuError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for LbuError {
    fn from(err: std::io::Error) -> Self {
        LbuError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LbuError {
    fn from(err: serde_json::Error) -> Self {
        LbuError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LbuError {
    fn from(err: chrono::ParseError) -> Self {
        LbuError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for LbuError {
    fn from(err: reqwest::Error) -> Self {
        LbuError::RemoteService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LbuError>;
