//! LBU University - 大学管理微服务后端
//!
//! 认证、课程、学生、财务、图书馆五个服务，可以在同一进程内全部启用，
//! 也可以按 `services.enabled` 分别部署。服务之间通过 href 和 HTTP 调用互相引用。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `clients`: 服务间 HTTP 客户端
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod clients;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
