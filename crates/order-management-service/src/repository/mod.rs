//! 数据库仓储层
//!
//! 订单、用户、目录、积分流水与公司信息的 SQL 访问都收在这里。
//!
//! ## 约定
//!
//! - 仓储只做持久化，业务规则留在服务层
//! - 事务由服务层开启，`*_in_tx` 方法挂在事务连接上执行
//! - 仓储接口 trait 化，服务层测试以 mockall 替身注入

mod catalog_repo;
mod company_repo;
mod ledger_repo;
mod order_repo;
mod traits;
mod user_repo;

pub use catalog_repo::CatalogRepository;
pub use company_repo::CompanyRepository;
pub use ledger_repo::LedgerRepository;
pub use order_repo::OrderRepository;
pub use traits::*;
pub use user_repo::UserRepository;
