//! 协作方实体定义
//!
//! 用户、产品、经销商等目录数据，订单核心只读引用

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// 用户
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    /// 姓名
    pub name: String,
    /// 邮箱（唯一）
    pub email: String,
    /// bcrypt 密码散列，不参与序列化
    #[serde(skip_serializing)]
    pub password: String,
    /// 角色
    pub user_role: UserRole,
    /// 手机号
    #[sqlx(default)]
    pub mobile_no: Option<String>,
    /// 公司/事务所名称
    #[sqlx(default)]
    pub firm_name: Option<String>,
    /// 办公地址
    #[sqlx(default)]
    pub office_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 产品
///
/// point 为每单位数量可兑换的积分数
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// 产品编码
    pub code: String,
    /// 产品类型（物料类别）
    pub product_type: String,
    /// 单位积分
    pub point: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 下拉展示用标签："名称 - 编码 - 积分"
    pub fn display_label(&self) -> String {
        format!("{} - {} - {}", self.name, self.code, self.point)
    }
}

/// 经销商
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户银行账户
///
/// 每个用户至多一条，user_id 上有唯一约束
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBankDetail {
    pub id: i64,
    pub user_id: i64,
    /// 银行账号
    pub account_no: String,
    /// IFSC 编码
    pub ifsc_code: String,
    /// 开户行名称
    pub bank_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 公司信息
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminCompanyDetail {
    pub id: i64,
    pub company_name: String,
    #[sqlx(default)]
    pub address: Option<String>,
    #[sqlx(default)]
    pub phone: Option<String>,
    #[sqlx(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_display_label() {
        let product = Product {
            id: 1,
            name: "Architect PPC".to_string(),
            code: "PPC50".to_string(),
            product_type: "Cement".to_string(),
            point: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(product.display_label(), "Architect PPC - PPC50 - 10");
    }

    #[test]
    fn test_user_password_not_serialized() {
        let user = User {
            id: 1,
            name: "Ravi Kumar".to_string(),
            email: "ravi@example.com".to_string(),
            password: "$2b$12$secret".to_string(),
            user_role: UserRole::Normal,
            mobile_no: None,
            firm_name: None,
            office_address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret"));
        assert!(json.contains("ravi@example.com"));
    }
}
