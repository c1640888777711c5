//! 订单生命周期服务
//!
//! 处理订单状态流转的核心业务逻辑，包括：
//! - 管理员确认（PENDING -> CONFIRM）
//! - 标记发货（PENDING/CONFIRM -> DELIVERED）
//! - 取消订单（积分清零 + 首单奖励冲销）
//!
//! 每次流转在单个事务内完成，订单行通过 `SELECT ... FOR UPDATE`
//! 加行级锁，并发的确认与取消在此串行化，后到者观察到新状态并
//! 以冲突失败。取消涉及跨行的冲销判定，额外持有用户级锁。
//!
//! ## 状态机
//!
//! PENDING -> {CONFIRM, DELIVERED, CANCELLED}
//! CONFIRM -> {DELIVERED, CANCELLED}
//! DELIVERED / CANCELLED 为终态，任何流出尝试均为冲突

use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument, warn};

use rewards_shared::observability::metrics;

use crate::error::{OrderError, Result};
use crate::lock::{self, LockManager};
use crate::models::{NewLedgerEntry, Order, OrderDetail, OrderStatus};
use crate::repository::{LedgerRepository, OrderRepository, OrderRepositoryTrait};
use crate::service::bonus;
use crate::service::dto::CancelOrderRequest;

/// 取消原因的最大长度（字符数）
const MAX_REASON_LENGTH: usize = 500;

/// 订单生命周期服务
///
/// 确认与发货仅依赖行级锁；取消因包含首单冲销的跨行扫描，
/// 在事务外先获取 `order:user:{user_id}` 用户锁。
pub struct LifecycleService<OR>
where
    OR: OrderRepositoryTrait,
{
    order_repo: Arc<OR>,
    lock_manager: Arc<LockManager>,
    pool: PgPool,
}

impl<OR> LifecycleService<OR>
where
    OR: OrderRepositoryTrait,
{
    pub fn new(order_repo: Arc<OR>, lock_manager: Arc<LockManager>, pool: PgPool) -> Self {
        Self {
            order_repo,
            lock_manager,
            pool,
        }
    }

    /// 管理员确认订单
    ///
    /// 已确认（admin_confirm = 1）或已取消的订单拒绝确认。
    /// 已发货订单的 admin_confirm 必为 1，同样命中已确认分支。
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn confirm_order(&self, order_id: i64) -> Result<OrderDetail> {
        let mut tx = self.pool.begin().await?;

        // 1. 行级锁加载订单
        let order = OrderRepository::get_order_for_update(&mut tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        // 2. 状态检查
        if order.is_confirmed() {
            return Err(OrderError::AlreadyConfirmed(order_id));
        }
        if order.is_cancelled() {
            return Err(OrderError::InvalidOrderStatus {
                order_id,
                current_status: order.order_status.as_str().to_string(),
            });
        }

        // 3. 置确认标记并流转状态
        OrderRepository::update_status_in_tx(&mut tx, order_id, OrderStatus::Confirm, 1).await?;
        tx.commit().await?;

        metrics::record_status_transition(
            order.order_status.as_str(),
            OrderStatus::Confirm.as_str(),
        );

        info!(
            order_id = order_id,
            from = order.order_status.as_str(),
            "订单确认成功"
        );

        self.load_detail(order_id).await
    }

    /// 管理员标记发货
    ///
    /// 已发货或已取消的订单拒绝重复操作；允许 PENDING 直接发货，
    /// 发货同时置确认标记。
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn mark_delivered(&self, order_id: i64) -> Result<OrderDetail> {
        let mut tx = self.pool.begin().await?;

        let order = OrderRepository::get_order_for_update(&mut tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        if order.order_status == OrderStatus::Delivered || order.is_cancelled() {
            return Err(OrderError::InvalidOrderStatus {
                order_id,
                current_status: order.order_status.as_str().to_string(),
            });
        }

        OrderRepository::update_status_in_tx(&mut tx, order_id, OrderStatus::Delivered, 1).await?;
        tx.commit().await?;

        metrics::record_status_transition(
            order.order_status.as_str(),
            OrderStatus::Delivered.as_str(),
        );

        info!(
            order_id = order_id,
            from = order.order_status.as_str(),
            "订单发货成功"
        );

        self.load_detail(order_id).await
    }

    /// 取消订单
    ///
    /// 完整流程：
    /// 1. 校验取消原因（必填，<= 500 字符）
    /// 2. 预读订单定位归属用户，非管理员仅能取消本人订单
    /// 3. 获取用户锁 `order:user:{user_id}`
    /// 4. 事务内：行级锁复核状态 -> 首单冲销判定 -> 置取消态
    /// 5. 释放锁并返回订单详情
    #[instrument(skip(self, request), fields(
        order_id = %request.order_id,
        actor_id = %request.actor_id,
        admin = request.admin
    ))]
    pub async fn cancel_order(&self, request: CancelOrderRequest) -> Result<OrderDetail> {
        // 1. 参数校验
        validate_reason(&request.reason)?;

        // 2. 预读定位归属用户，user_id 不会变更，可在锁外读取
        let order = self
            .order_repo
            .get_order(request.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(request.order_id))?;

        if !request.admin && order.user_id != request.actor_id {
            return Err(OrderError::Forbidden(
                "Access denied. You can only cancel your own orders.".to_string(),
            ));
        }

        // 3. 获取用户锁：冲销判定与取消写入共享同一串行化窗口
        let lock_key = lock::user_order_key(order.user_id);
        let guard = self.lock_manager.acquire(&lock_key, None).await?;

        // 4. 事务内执行取消
        let outcome = self.execute_cancel(&request).await;

        if let Err(e) = guard.release().await {
            warn!(error = %e, "释放用户锁失败，锁将依赖 TTL 过期");
        }

        let (from_status, retracted) = outcome?;

        let actor = if request.admin { "admin" } else { "user" };
        metrics::record_order_cancellation(actor, "success");
        metrics::record_status_transition(from_status.as_str(), OrderStatus::Cancelled.as_str());
        if retracted {
            metrics::record_bonus_entry("retraction");
        }

        info!(
            order_id = request.order_id,
            from = from_status.as_str(),
            retracted = retracted,
            "订单取消成功"
        );

        self.load_detail(request.order_id).await
    }

    // ==================== 内部实现 ====================

    /// 取消事务，单事务内依次完成：
    /// - 行级锁复核状态（已取消 / 已发货即冲突）
    /// - 基于取消前状态的首单冲销判定
    /// - 订单置取消态：积分清零、确认标记复位、记录原因
    async fn execute_cancel(&self, request: &CancelOrderRequest) -> Result<(OrderStatus, bool)> {
        let mut tx = self.pool.begin().await?;

        let order = OrderRepository::get_order_for_update(&mut tx, request.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(request.order_id))?;

        if order.is_cancelled() || order.order_status == OrderStatus::Delivered {
            return Err(OrderError::InvalidOrderStatus {
                order_id: request.order_id,
                current_status: order.order_status.as_str().to_string(),
            });
        }

        let retracted = retract_bonus_if_needed(&mut tx, &order).await?;

        OrderRepository::mark_cancelled_in_tx(&mut tx, request.order_id, &request.reason).await?;

        tx.commit().await?;

        Ok((order.order_status, retracted))
    }

    /// 加载订单详情用于响应
    async fn load_detail(&self, order_id: i64) -> Result<OrderDetail> {
        self.order_repo
            .get_order_detail(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))
    }
}

/// 首单奖励冲销
///
/// 取消的行属于首单批次、数量达标，且同批剩余未取消行均不达标时，
/// 追加一条 -2100 冲销流水。从未发放或已冲销（无未兑换的发放记录）
/// 时不再追加。
async fn retract_bonus_if_needed(tx: &mut PgConnection, order: &Order) -> Result<bool> {
    // 首单定位包含已取消的行，按 order_date, id 升序
    let first_order = OrderRepository::first_order_in_tx(tx, order.user_id).await?;
    let is_first_batch = first_order
        .map(|f| f.batch_id == order.batch_id)
        .unwrap_or(false);

    let siblings =
        OrderRepository::list_batch_siblings_in_tx(tx, order.user_id, order.batch_id, order.id)
            .await?;
    let sibling_quantities: Vec<i32> = siblings.iter().map(|s| s.quantity).collect();

    if !bonus::retract_on_cancel(is_first_batch, order.quantity, &sibling_quantities) {
        return Ok(false);
    }

    let grant =
        LedgerRepository::find_unredeemed_grant_in_tx(tx, order.user_id, bonus::BONUS_POINTS)
            .await?;
    if grant.is_none() {
        return Ok(false);
    }

    let entry = NewLedgerEntry::retraction(
        order.user_id,
        bonus::BONUS_POINTS,
        bonus::RETRACTION_DESCRIPTION,
    );
    LedgerRepository::create_in_tx(tx, &entry).await?;

    Ok(true)
}

/// 校验取消原因：必填且不超过 500 字符
fn validate_reason(reason: &str) -> Result<()> {
    if reason.trim().is_empty() {
        return Err(OrderError::Validation(
            "The cancellation reason field is required.".to_string(),
        ));
    }

    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(OrderError::Validation(format!(
            "The cancellation reason may not be greater than {} characters.",
            MAX_REASON_LENGTH
        )));
    }

    Ok(())
}
