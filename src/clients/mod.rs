//! 服务间 HTTP 调用
//!
//! 学生服务与图书馆服务通过这些接口访问认证、课程、图书馆和财务服务。
//! 每次调用都转发调用方的 `Authorization: Bearer ...` 请求头，不做重试。

pub mod http;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::AuthToken;
use crate::models::MessageDto;
use crate::models::auth::responses::JwtTokenDto;
use crate::models::courses::responses::CourseDto;
use crate::models::finance::requests::AccountRequest;
use crate::models::finance::responses::AccountDto;

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// `POST {auth_url}{authUserHref}`，把用户升级为学生并返回新令牌
    async fn upgrade_user(&self, auth_user_href: &str, token: &AuthToken) -> Result<JwtTokenDto>;
}

#[async_trait]
pub trait CourseClient: Send + Sync {
    /// `GET {course_url}{courseHref}`
    async fn get_course(&self, course_href: &str, token: &AuthToken) -> Result<CourseDto>;
}

#[async_trait]
pub trait LibraryClient: Send + Sync {
    /// `POST {library_url}/library/student`
    async fn create_student(&self, token: &AuthToken) -> Result<MessageDto>;
}

#[async_trait]
pub trait FinanceClient: Send + Sync {
    /// `POST {finance_url}/finance/account`
    async fn create_account(
        &self,
        request: &AccountRequest,
        token: &AuthToken,
    ) -> Result<AccountDto>;
}

/// 下游服务客户端集合，作为 app_data 注入
#[derive(Clone)]
pub struct ServiceClients {
    pub auth: Arc<dyn AuthClient>,
    pub course: Arc<dyn CourseClient>,
    pub library: Arc<dyn LibraryClient>,
    pub finance: Arc<dyn FinanceClient>,
}

impl ServiceClients {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = http::build_client(config.services.request_timeout)?;
        let services = &config.services;

        Ok(Self {
            auth: Arc::new(http::HttpServiceClient::new(client.clone(), &services.auth_url)),
            course: Arc::new(http::HttpServiceClient::new(
                client.clone(),
                &services.course_url,
            )),
            library: Arc::new(http::HttpServiceClient::new(
                client.clone(),
                &services.library_url,
            )),
            finance: Arc::new(http::HttpServiceClient::new(client, &services.finance_url)),
        })
    }
}
