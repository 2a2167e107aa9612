//! 对象缓存层
//!
//! 通过 `declare_object_cache_plugin!` 在进程启动时注册后端 (moka / redis)，
//! 运行时按 `cache.type` 选择。目前用于缓存已解码的 JWT 声明。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::errors::{LbuError, Result};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端不可用或读取失败
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 以秒为单位，0 表示使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明缓存插件，在进程启动时注册到全局注册表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::connect()
                            .await
                            .map_err($crate::errors::LbuError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}

/// 按配置创建缓存，首选后端不可用时回退到 moka
pub async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let preferred = config.cache.cache_type.as_str();

    if let Some(constructor) = register::get_object_cache_plugin(preferred) {
        match constructor().await {
            Ok(cache) => return Ok(Arc::from(cache)),
            Err(e) if preferred != "moka" => {
                error!("Failed to initialize '{}' cache: {}", preferred, e);
                warn!("Falling back to in-memory moka cache");
            }
            Err(e) => return Err(e),
        }
    } else {
        warn!("Cache plugin '{}' not registered, using moka", preferred);
    }

    let constructor = register::get_object_cache_plugin("moka")
        .ok_or_else(|| LbuError::cache_plugin_not_found("moka"))?;
    Ok(Arc::from(constructor().await?))
}
