//! 订单服务领域模型
//!
//! 包含订单系统的所有核心实体定义

pub mod directory;
pub mod enums;
pub mod ledger;
pub mod order;

// 重新导出常用类型
pub use directory::{AdminCompanyDetail, Dealer, Product, User, UserBankDetail};
pub use enums::{OrderStatus, PointEntryStatus, PointEntryType, UserRole};
pub use ledger::{BonusLedgerEntry, NewLedgerEntry};
pub use order::{NewOrder, Order, OrderDetail};
