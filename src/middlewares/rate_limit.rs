/*!
 * 按客户端 IP 的固定窗口限流
 *
 * 用在无需登录的认证端点（登录、注册、重发激活邮件）上，
 * 每个端点用自己的前缀计数，互不影响。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 窗口从该 IP 在该端点的第一次请求开始计算，超过上限返回 429，
 * 并在 `Retry-After` 中给出窗口剩余秒数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::MessageDto;

use super::create_error_response;

// 计数窗口的最长保留时间，超过后条目被淘汰
const MAX_WINDOW: Duration = Duration::from_secs(3600);

#[derive(Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// 键: 端点前缀:IP
static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(MAX_WINDOW)
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs).min(MAX_WINDOW),
            key_prefix,
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    /// 重发激活邮件：3 次/分钟
    pub fn activation() -> Self {
        Self::new("activation", 3, 60)
    }
}

/// 客户端 IP，反向代理后面时取 X-Forwarded-For 的第一个地址
fn client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    let ip = info
        .realip_remote_addr()
        .map(|addr| addr.trim())
        .and_then(|addr| {
            addr.parse::<IpAddr>()
                .ok()
                .or_else(|| addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip()))
        })
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    ip
}

/// 计入一次请求，超限时返回窗口剩余秒数
async fn record_hit(key: String, limit: &RateLimit) -> Option<u64> {
    let now = Instant::now();
    let entry = WINDOWS
        .entry(key)
        .and_upsert_with(|existing| {
            let window = match existing.map(|e| e.into_value()) {
                Some(w) if now.duration_since(w.started) < limit.window => w,
                _ => Window {
                    started: now,
                    count: 0,
                },
            };
            std::future::ready(Window {
                count: window.count.saturating_add(1),
                ..window
            })
        })
        .await;

    let window = entry.into_value();
    if window.count > limit.max_requests {
        let elapsed = now.duration_since(window.started);
        Some(limit.window.saturating_sub(elapsed).as_secs().max(1))
    } else {
        None
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = format!("{}:{}", limit.key_prefix, client_ip(&req));

            if let Some(retry_after) = record_hit(key.clone(), &limit).await {
                warn!(
                    "Rate limit exceeded for {} ({} per {:?})",
                    key, limit.max_requests, limit.window
                );
                let mut response = create_error_response(
                    StatusCode::TOO_MANY_REQUESTS,
                    MessageDto::new(429, "Too many requests. Please try again later."),
                );
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(retry_after));
                return Ok(req.into_response(response.map_into_right_body()));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[::core::prelude::v1::test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window), (5, Duration::from_secs(60)));
        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::activation().key_prefix, "activation");
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let limit = RateLimit {
            max_requests: 1,
            window: Duration::from_millis(50),
            key_prefix: "window_reset",
        };
        assert_eq!(record_hit("window_reset:1.1.1.1".into(), &limit).await, None);
        assert!(record_hit("window_reset:1.1.1.1".into(), &limit).await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(record_hit("window_reset:1.1.1.1".into(), &limit).await, None);
    }

    #[actix_web::test]
    async fn test_limit_exceeded_returns_429() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new("test_limited", 2, 60))
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let call = |ip: &str| {
            test::TestRequest::get()
                .uri("/limited")
                .peer_addr(format!("{ip}:4000").parse().expect("addr"))
                .to_request()
        };

        for _ in 0..2 {
            let resp = test::call_service(&app, call("10.1.2.3")).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = test::call_service(&app, call("10.1.2.3")).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));
        let body: MessageDto = test::read_body_json(resp).await;
        assert_eq!(body.code, 429);

        // 其他 IP 不受影响
        let resp = test::call_service(&app, call("10.1.2.4")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
