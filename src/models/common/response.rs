use serde::{Deserialize, Serialize};

// 统一的消息响应结构，错误与纯消息类成功响应共用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
    pub code: i32,
}

impl MessageDto {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// HTTP 200 风格的成功消息
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(200, message)
    }
}
