//! 仓储接口
//!
//! 服务层依赖这些 trait 而非具体仓储，单元测试注入 mockall 替身

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AdminCompanyDetail, BonusLedgerEntry, Dealer, NewLedgerEntry, Order, OrderDetail, OrderStatus,
    Product, User, UserBankDetail, UserRole,
};

/// 订单仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    async fn get_order(&self, id: i64) -> Result<Option<Order>>;
    async fn get_order_detail(&self, id: i64) -> Result<Option<OrderDetail>>;
    async fn list_details_by_user(&self, user_id: i64) -> Result<Vec<OrderDetail>>;
    async fn list_details(&self) -> Result<Vec<OrderDetail>>;
    async fn count_orders(&self) -> Result<i64>;
    async fn count_by_status(&self, status: OrderStatus) -> Result<i64>;
}

/// 奖励积分流水仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    async fn create(&self, entry: &NewLedgerEntry) -> Result<i64>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<BonusLedgerEntry>>;
    async fn get_balance(&self, user_id: i64) -> Result<i64>;
}

/// 目录仓储接口（产品 + 经销商）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepositoryTrait: Send + Sync {
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;
    async fn get_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>>;
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>>;
    async fn get_dealer(&self, id: i64) -> Result<Option<Dealer>>;
    async fn list_dealers(&self) -> Result<Vec<Dealer>>;
    async fn count_dealers(&self) -> Result<i64>;
}

/// 用户仓储接口（用户 + 银行账户）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;
    async fn update_profile<'a>(
        &self,
        id: i64,
        name: &str,
        mobile_no: Option<&'a str>,
        firm_name: Option<&'a str>,
        office_address: Option<&'a str>,
    ) -> Result<()>;
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()>;
    async fn count_by_role(&self, role: UserRole) -> Result<i64>;

    async fn get_bank_detail(&self, user_id: i64) -> Result<Option<UserBankDetail>>;
    async fn create_bank_detail(
        &self,
        user_id: i64,
        account_no: &str,
        ifsc_code: &str,
        bank_name: &str,
    ) -> Result<UserBankDetail>;
    async fn update_bank_detail(
        &self,
        user_id: i64,
        account_no: &str,
        ifsc_code: &str,
        bank_name: &str,
    ) -> Result<Option<UserBankDetail>>;
}

/// 公司信息仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepositoryTrait: Send + Sync {
    async fn get_company_detail(&self) -> Result<Option<AdminCompanyDetail>>;
    async fn upsert_company_detail<'a>(
        &self,
        company_name: &str,
        address: Option<&'a str>,
        phone: Option<&'a str>,
        email: Option<&'a str>,
    ) -> Result<AdminCompanyDetail>;
}
