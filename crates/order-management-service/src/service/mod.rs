//! 订单业务服务层
//!
//! 包含订单域的全部业务逻辑：
//! - placement_service: 批量下单与首单奖励发放
//! - lifecycle_service: 确认、发货与取消流转
//! - summary_service: 积分明细与订单历史查询
//! - bonus: 首单奖励的纯判定规则
//! - dto: 服务层请求与响应数据结构

pub mod bonus;
pub mod dto;
pub mod lifecycle_service;
pub mod placement_service;
pub mod summary_service;

pub use lifecycle_service::LifecycleService;
pub use placement_service::PlacementService;
pub use summary_service::SummaryService;
