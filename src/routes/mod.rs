pub mod auth;
pub mod courses;
pub mod finance;
pub mod library;
pub mod students;

use actix_web::web;
use tracing::warn;

use crate::config::AppConfig;

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use finance::configure_finance_routes;
pub use library::configure_library_routes;
pub use students::configure_student_routes;

/// 按 `services.enabled` 挂载服务模块
pub fn configure_enabled_routes(cfg: &mut web::ServiceConfig) {
    let config = AppConfig::get();
    let modules: [(&str, fn(&mut web::ServiceConfig)); 5] = [
        ("auth", configure_auth_routes),
        ("course", configure_course_routes),
        ("student", configure_student_routes),
        ("finance", configure_finance_routes),
        ("library", configure_library_routes),
    ];

    for (name, configure) in modules {
        if config.is_service_enabled(name) {
            warn!("Mounting {} service routes", name);
            configure(cfg);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};

    use crate::clients::{AuthClient, CourseClient, FinanceClient, LibraryClient, ServiceClients};
    use crate::errors::{LbuError, Result};
    use crate::middlewares::AuthToken;
    use crate::models::MessageDto;
    use crate::models::auth::responses::JwtTokenDto;
    use crate::models::courses::responses::CourseDto;
    use crate::models::finance::requests::AccountRequest;
    use crate::models::finance::responses::AccountDto;

    use crate::models::auth::entities::{User, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::jwt::JwtUtils;
    use crate::utils::{json_error_handler, query_error_handler};

    pub async fn storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::in_memory().await.expect("in-memory storage"))
    }

    pub fn user(id: &str, role: UserRole) -> User {
        User {
            id: id.into(),
            username: format!("user-{}", &id[..8]),
            email: format!("{}@lbu.ac.uk", &id[..8]),
            password_hash: String::new(),
            first_name: "Test".into(),
            last_name: "User".into(),
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            role,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    /// 为给定用户 ID 和角色签发令牌
    pub fn bearer(id: &str, role: UserRole) -> (&'static str, String) {
        let token = JwtUtils::generate_token(&user(id, role)).expect("token");
        ("Authorization", format!("Bearer {token}"))
    }

    pub fn json_config() -> web::JsonConfig {
        web::JsonConfig::default().error_handler(json_error_handler)
    }

    pub fn query_config() -> web::QueryConfig {
        web::QueryConfig::default().error_handler(query_error_handler)
    }

    /// 下游服务替身：升级令牌直接签发，课程固定，财务请求被记录
    #[derive(Default)]
    pub struct MockServices {
        pub fail_finance: bool,
        pub accounts: Mutex<Vec<AccountRequest>>,
        pub library_students: Mutex<usize>,
    }

    impl MockServices {
        pub fn into_clients(self: Arc<Self>) -> ServiceClients {
            ServiceClients {
                auth: self.clone(),
                course: self.clone(),
                library: self.clone(),
                finance: self,
            }
        }
    }

    #[async_trait]
    impl AuthClient for MockServices {
        async fn upgrade_user(&self, auth_user_href: &str, _: &AuthToken) -> Result<JwtTokenDto> {
            let user_id = auth_user_href.trim_start_matches("/auth/user/");
            let token = JwtUtils::generate_token(&user(user_id, UserRole::Student))
                .map_err(|e| LbuError::remote_service(e.message()))?;
            Ok(JwtTokenDto {
                jwt_token: token,
                user_id: Some(user_id.to_string()),
            })
        }
    }

    #[async_trait]
    impl CourseClient for MockServices {
        async fn get_course(&self, course_href: &str, _: &AuthToken) -> Result<CourseDto> {
            Ok(CourseDto {
                id_href: course_href.to_string(),
                title: "Compilers".into(),
                description: "Parsing and code generation".into(),
                fees: Decimal::new(75000, 2),
                duration_in_days: 30,
                instructor: None,
            })
        }
    }

    #[async_trait]
    impl LibraryClient for MockServices {
        async fn create_student(&self, _: &AuthToken) -> Result<MessageDto> {
            *self.library_students.lock().expect("lock") += 1;
            Ok(MessageDto::ok("Student created"))
        }
    }

    #[async_trait]
    impl FinanceClient for MockServices {
        async fn create_account(
            &self,
            request: &AccountRequest,
            _: &AuthToken,
        ) -> Result<AccountDto> {
            if self.fail_finance {
                return Err(LbuError::remote_service("503 Service Unavailable"));
            }
            self.accounts.lock().expect("lock").push(request.clone());
            Ok(AccountDto {
                id: uuid::Uuid::new_v4().to_string(),
                auth_user_href: request.auth_user_href.clone().unwrap_or_default(),
                invoice_list: Vec::new(),
            })
        }
    }
}
