//! 基础设施共享库
//!
//! 配置加载、数据库与缓存连接、错误类型和可观测性，
//! 供各服务 crate 复用。

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod observability;
pub mod test_utils;
