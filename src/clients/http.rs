//! 基于 reqwest 的客户端实现

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{AuthClient, CourseClient, FinanceClient, LibraryClient};
use crate::errors::{LbuError, Result};
use crate::middlewares::AuthToken;
use crate::models::MessageDto;
use crate::models::auth::responses::JwtTokenDto;
use crate::models::courses::responses::CourseDto;
use crate::models::finance::requests::AccountRequest;
use crate::models::finance::responses::AccountDto;

pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LbuError::remote_service(format!("HTTP 客户端创建失败: {e}")))
}

/// 指向某个服务基础地址的客户端
#[derive(Clone)]
pub struct HttpServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpServiceClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("下游服务返回错误 {}: {}", status, body);
            return Err(LbuError::remote_service(format!("{status}: {body}")));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AuthClient for HttpServiceClient {
    async fn upgrade_user(&self, auth_user_href: &str, token: &AuthToken) -> Result<JwtTokenDto> {
        let url = self.url(auth_user_href);
        debug!("POST {}", url);
        self.send(
            self.client
                .post(url)
                .header(AUTHORIZATION, token.bearer()),
        )
        .await
    }
}

#[async_trait]
impl CourseClient for HttpServiceClient {
    async fn get_course(&self, course_href: &str, token: &AuthToken) -> Result<CourseDto> {
        let url = self.url(course_href);
        debug!("GET {}", url);
        self.send(self.client.get(url).header(AUTHORIZATION, token.bearer()))
            .await
    }
}

#[async_trait]
impl LibraryClient for HttpServiceClient {
    async fn create_student(&self, token: &AuthToken) -> Result<MessageDto> {
        let url = self.url("/library/student");
        debug!("POST {}", url);
        self.send(
            self.client
                .post(url)
                .header(AUTHORIZATION, token.bearer()),
        )
        .await
    }
}

#[async_trait]
impl FinanceClient for HttpServiceClient {
    async fn create_account(
        &self,
        request: &AccountRequest,
        token: &AuthToken,
    ) -> Result<AccountDto> {
        let url = self.url("/finance/account");
        debug!("POST {}", url);
        self.send(
            self.client
                .post(url)
                .header(AUTHORIZATION, token.bearer())
                .json(request),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpServiceClient::new(reqwest::Client::new(), "http://127.0.0.1:8080/");
        assert_eq!(
            client.url("/auth/user/abc"),
            "http://127.0.0.1:8080/auth/user/abc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_remote_error() {
        let client = HttpServiceClient::new(build_client(1).expect("client"), "http://127.0.0.1:9");
        let token = AuthToken("t".into());
        let err = client.create_student(&token).await.unwrap_err();
        assert_eq!(err.code(), "E010");
    }
}
