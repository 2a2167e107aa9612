use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, create_cache};
use crate::clients::ServiceClients;
use crate::config::AppConfig;
use crate::errors::{LbuError, Result};
use crate::models::auth::entities::{NewUser, UserRole};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_code;

const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub clients: ServiceClients,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 初始化默认管理员账号
///
/// 图书管理接口只对 ADMIN 开放，而注册接口只能创建普通用户，
/// 所以首次启动时创建一个已激活的 admin 账号。已存在时跳过。
pub async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    if storage.get_user_by_username(ADMIN_USERNAME).await?.is_some() {
        debug!("Admin account already exists, skipping admin seed");
        return Ok(());
    }
    info!("No admin account found, creating default admin account...");

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let user = storage
        .create_user(NewUser {
            username: ADMIN_USERNAME.to_string(),
            email: "admin@lbu.ac.uk".to_string(),
            password_hash: hash_password(&password)?,
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
        })
        .await?;

    let activation = storage
        .replace_activation(&user.id, &generate_random_code(32))
        .await?;
    storage.activate_user(&activation).await?;
    storage.set_user_role(&user.id, UserRole::Admin).await?;

    info!(
        "Default admin account created successfully (ID: {}, username: {})",
        user.id, user.username
    );
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和下游服务客户端
pub async fn prepare_server_startup() -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| LbuError::startup("Failed to install rustls crypto provider"))?;

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    if config.is_service_enabled("auth") {
        if let Err(e) = seed_admin(&storage).await {
            warn!("Failed to seed admin account: {}", e);
        }
    }

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    let clients = ServiceClients::from_config(config)?;
    warn!(
        "Service clients ready (auth: {}, course: {}, finance: {}, library: {})",
        config.services.auth_url,
        config.services.course_url,
        config.services.finance_url,
        config.services.library_url
    );

    Ok(StartupContext {
        storage,
        cache,
        clients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let storage: Arc<dyn Storage> =
            Arc::new(SeaOrmStorage::in_memory().await.expect("storage"));

        seed_admin(&storage).await.expect("first seed");
        seed_admin(&storage).await.expect("second seed");

        let admin = storage
            .get_user_by_username(ADMIN_USERNAME)
            .await
            .expect("query")
            .expect("admin exists");
        assert_eq!(admin.role, UserRole::Admin);
        assert!(admin.enabled && admin.account_non_locked);
    }
}
