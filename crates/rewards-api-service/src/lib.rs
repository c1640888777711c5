//! 积分奖励订货 API 服务
//!
//! 面向建筑师用户与管理员的 REST API。
//!
//! ## 核心功能
//!
//! - **认证**：注册、登录、登出，基于 JWT 的无状态会话
//! - **目录**：产品列表、按类型下拉选项、经销商列表（带缓存）
//! - **订单**：批量下单、取消、订单历史、积分明细
//! - **管理端**：仪表盘统计、订单审核（确认/发货/取消）、公司信息
//! - **资料**：个人资料、修改密码、银行账户维护
//!
//! ## 模块结构
//!
//! - `auth`: JWT 签发校验与 bcrypt 密码散列
//! - `dto`: 请求与响应结构，对外统一 camelCase
//! - `error`: API 错误到响应信封的映射
//! - `handlers`: 各业务域的端点实现
//! - `middleware`: 鉴权与管理员角色检查
//! - `routes`: URL 到处理器的映射
//! - `state`: 处理器共享的依赖集合
//!
//! 基于 Axum 构建，入参经 validator 校验。

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// 重新导出核心类型
pub use auth::{Claims, JwtConfig, JwtManager};
pub use dto::{
    AdminOrderDto, AdminOrderListDto, ApiResponse, BankDetailDto, BankDetailRequest,
    CancelOrderHttpRequest, ChangePasswordRequest, CompanyDetailDto, CompanyDetailRequest,
    DashboardTotals, DealerDto, OrderActionDto, PlaceOrderHttpRequest, ProductDto,
    ProductOptionDto, ProfileDto, UpdateProfileRequest,
};
pub use error::{ApiError, Result};
pub use state::AppState;

// 从 order-management 重新导出核心模型
// 便于 API 服务的调用方直接使用
pub use order_management::models::{Order, OrderDetail, OrderStatus, User, UserRole};
