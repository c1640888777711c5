//! 积分明细与订单历史查询服务
//!
//! 纯读取投影，不涉及事务与锁：
//! - 积分明细：奖励流水条目与订单条目合并为统一视图
//! - 订单历史：用户订单的展示视图，日期格式化为 Y-m-d
//!
//! 合并规则：流水条目按创建时间倒序排在前，订单条目按下单时间
//! 倒序跟随其后。已取消订单的积分在落库时已清零，投影层只负责
//! 映射符号与类型，不做二次计算。

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::Result;
use crate::models::{
    BonusLedgerEntry, OrderDetail, OrderStatus, PointEntryStatus, PointEntryType,
};
use crate::repository::{LedgerRepositoryTrait, OrderRepositoryTrait};
use crate::service::dto::{OrderHistoryEntryDto, PointEntryDto};

/// 积分明细与订单历史查询服务
pub struct SummaryService<OR, LR>
where
    OR: OrderRepositoryTrait,
    LR: LedgerRepositoryTrait,
{
    order_repo: Arc<OR>,
    ledger_repo: Arc<LR>,
}

impl<OR, LR> SummaryService<OR, LR>
where
    OR: OrderRepositoryTrait,
    LR: LedgerRepositoryTrait,
{
    pub fn new(order_repo: Arc<OR>, ledger_repo: Arc<LR>) -> Self {
        Self {
            order_repo,
            ledger_repo,
        }
    }

    /// 查询用户积分明细
    ///
    /// 流水条目（含首单奖励的发放与冲销）在前，订单条目在后。
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_point_summary(&self, user_id: i64) -> Result<Vec<PointEntryDto>> {
        // 1. 奖励流水，按创建时间倒序
        let ledger_entries = self.ledger_repo.list_by_user(user_id).await?;

        // 2. 用户订单明细，按下单时间倒序
        let orders = self.order_repo.list_details_by_user(user_id).await?;

        let mut entries = Vec::with_capacity(ledger_entries.len() + orders.len());
        entries.extend(ledger_entries.iter().map(ledger_point_entry));
        entries.extend(orders.iter().map(order_point_entry));

        info!(user_id = user_id, count = entries.len(), "积分明细查询完成");

        Ok(entries)
    }

    /// 查询用户订单历史
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_order_history(&self, user_id: i64) -> Result<Vec<OrderHistoryEntryDto>> {
        let orders = self.order_repo.list_details_by_user(user_id).await?;
        let history: Vec<OrderHistoryEntryDto> = orders.iter().map(history_entry).collect();

        info!(user_id = user_id, count = history.len(), "订单历史查询完成");

        Ok(history)
    }
}

// ==================== 映射函数 ====================

/// 流水条目映射：符号保留，负数为兑换（追回）
fn ledger_point_entry(entry: &BonusLedgerEntry) -> PointEntryDto {
    let entry_type = if entry.redeem_points < 0 {
        PointEntryType::Redeem
    } else {
        PointEntryType::Gain
    };

    PointEntryDto {
        points: entry.redeem_points,
        entry_type,
        redemption_amount: entry.redeem_points.abs(),
        description: entry.description.clone(),
        status: PointEntryStatus::Completed,
    }
}

/// 订单条目映射
///
/// 已取消订单取负号（积分已清零，结果恒为 0），类型与状态标记为
/// 兑换 / 已取消；已兑换订单（redeem_point_status = 1）同样标记为
/// 兑换类型。
fn order_point_entry(detail: &OrderDetail) -> PointEntryDto {
    let cancelled = detail.order_status == OrderStatus::Cancelled;

    let points = if cancelled {
        -detail.redeem_points
    } else {
        detail.redeem_points
    };

    let entry_type = if cancelled || detail.redeem_point_status == 1 {
        PointEntryType::Redeem
    } else {
        PointEntryType::Gain
    };

    let status = if cancelled {
        PointEntryStatus::Cancelled
    } else {
        PointEntryStatus::Completed
    };

    PointEntryDto {
        points,
        entry_type,
        redemption_amount: points.abs(),
        description: detail.product_name.clone(),
        status,
    }
}

/// 订单历史条目映射，日期格式化为 Y-m-d
fn history_entry(detail: &OrderDetail) -> OrderHistoryEntryDto {
    OrderHistoryEntryDto {
        id: detail.id,
        order_placed_date: detail.order_date.format("%Y-%m-%d").to_string(),
        material_name: detail.product_type.clone(),
        product_name: detail.product_name.clone(),
        product_code: detail.product_code.clone(),
        dealer_name: detail.dealer_name.clone(),
        quantity: detail.quantity,
        status: detail.order_status,
    }
}
