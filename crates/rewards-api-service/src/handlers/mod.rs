//! REST 端点处理器
//!
//! 按业务域分文件：认证、目录、下单、个人资料、管理端

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod profile;
