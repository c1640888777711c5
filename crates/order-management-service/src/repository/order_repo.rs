//! 订单仓储
//!
//! 提供订单行的数据访问，状态流转场景使用事务和行级锁

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use super::traits::OrderRepositoryTrait;
use crate::error::Result;
use crate::models::{NewOrder, Order, OrderDetail, OrderStatus};

/// 订单仓储
///
/// 负责订单行的查询与生命周期写入，写入路径全部走事务方法
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 池上查询 ====================

    /// 根据 ID 获取订单行
    pub async fn get_order(&self, id: i64) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, product_id, dealer_id, batch_id, quantity,
                   redeem_points, order_status, admin_confirm, redeem_point_status,
                   order_date, cancellation_reason, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// 根据 ID 获取订单详情（含用户/产品/经销商展示字段）
    pub async fn get_order_detail(&self, id: i64) -> Result<Option<OrderDetail>> {
        let detail = sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT o.id, o.user_id, u.name AS user_name, u.email AS user_email,
                   o.product_id, p.name AS product_name, p.code AS product_code,
                   p.product_type, o.dealer_id, d.name AS dealer_name,
                   d.mobile AS dealer_mobile, o.batch_id, o.quantity,
                   o.redeem_points, o.order_status, o.admin_confirm,
                   o.redeem_point_status, o.order_date, o.cancellation_reason,
                   o.created_at
            FROM orders o
            JOIN users u ON u.id = o.user_id
            JOIN products p ON p.id = o.product_id
            JOIN dealers d ON d.id = o.dealer_id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// 列出用户的订单详情，最新的在前
    pub async fn list_details_by_user(&self, user_id: i64) -> Result<Vec<OrderDetail>> {
        let details = sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT o.id, o.user_id, u.name AS user_name, u.email AS user_email,
                   o.product_id, p.name AS product_name, p.code AS product_code,
                   p.product_type, o.dealer_id, d.name AS dealer_name,
                   d.mobile AS dealer_mobile, o.batch_id, o.quantity,
                   o.redeem_points, o.order_status, o.admin_confirm,
                   o.redeem_point_status, o.order_date, o.cancellation_reason,
                   o.created_at
            FROM orders o
            JOIN users u ON u.id = o.user_id
            JOIN products p ON p.id = o.product_id
            JOIN dealers d ON d.id = o.dealer_id
            WHERE o.user_id = $1
            ORDER BY o.order_date DESC, o.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// 列出全部订单详情（管理端），最新的在前
    pub async fn list_details(&self) -> Result<Vec<OrderDetail>> {
        let details = sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT o.id, o.user_id, u.name AS user_name, u.email AS user_email,
                   o.product_id, p.name AS product_name, p.code AS product_code,
                   p.product_type, o.dealer_id, d.name AS dealer_name,
                   d.mobile AS dealer_mobile, o.batch_id, o.quantity,
                   o.redeem_points, o.order_status, o.admin_confirm,
                   o.redeem_point_status, o.order_date, o.cancellation_reason,
                   o.created_at
            FROM orders o
            JOIN users u ON u.id = o.user_id
            JOIN products p ON p.id = o.product_id
            JOIN dealers d ON d.id = o.dealer_id
            ORDER BY o.order_date DESC, o.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// 统计订单总数
    pub async fn count_orders(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// 按状态统计订单数
    pub async fn count_by_status(&self, status: OrderStatus) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM orders WHERE order_status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    // ==================== 事务内读写 ====================

    /// 在事务中检查用户是否已有订单
    ///
    /// 首批奖励资格在批次开始前判定一次，批内所有行共享同一结果
    pub async fn has_any_orders_in_tx(tx: &mut PgConnection, user_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM orders WHERE user_id = $1) AS present")
            .bind(user_id)
            .fetch_one(tx)
            .await?;

        Ok(row.get("present"))
    }

    /// 在事务中创建订单行
    ///
    /// 新订单始终以 PENDING 状态、未确认、未兑换落库，返回新记录的 ID
    pub async fn create_in_tx(tx: &mut PgConnection, order: &NewOrder) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (user_id, product_id, dealer_id, batch_id, quantity,
                                redeem_points, order_status, admin_confirm,
                                redeem_point_status, order_date)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', 0, 0, $7)
            RETURNING id
            "#,
        )
        .bind(order.user_id)
        .bind(order.product_id)
        .bind(order.dealer_id)
        .bind(order.batch_id)
        .bind(order.quantity)
        .bind(order.redeem_points)
        .bind(order.order_date)
        .fetch_one(tx)
        .await?;

        Ok(row.get("id"))
    }

    /// 在事务中获取订单行（带行级锁）
    ///
    /// 使用 FOR UPDATE 锁定行，并发的状态流转在此串行化
    pub async fn get_order_for_update(tx: &mut PgConnection, id: i64) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, product_id, dealer_id, batch_id, quantity,
                   redeem_points, order_status, admin_confirm, redeem_point_status,
                   order_date, cancellation_reason, created_at, updated_at
            FROM orders
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(tx)
        .await?;

        Ok(order)
    }

    /// 在事务中获取用户时间上最早的订单
    ///
    /// order_date 相同时按 id 升序决胜，包含已取消订单
    pub async fn first_order_in_tx(tx: &mut PgConnection, user_id: i64) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, product_id, dealer_id, batch_id, quantity,
                   redeem_points, order_status, admin_confirm, redeem_point_status,
                   order_date, cancellation_reason, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY order_date ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(tx)
        .await?;

        Ok(order)
    }

    /// 在事务中列出同批次的其他未取消订单
    pub async fn list_batch_siblings_in_tx(
        tx: &mut PgConnection,
        user_id: i64,
        batch_id: Uuid,
        exclude_id: i64,
    ) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, product_id, dealer_id, batch_id, quantity,
                   redeem_points, order_status, admin_confirm, redeem_point_status,
                   order_date, cancellation_reason, created_at, updated_at
            FROM orders
            WHERE user_id = $1 AND batch_id = $2 AND id != $3
              AND order_status != 'CANCELLED'
            "#,
        )
        .bind(user_id)
        .bind(batch_id)
        .bind(exclude_id)
        .fetch_all(tx)
        .await?;

        Ok(orders)
    }

    /// 在事务中更新订单状态与确认标记
    pub async fn update_status_in_tx(
        tx: &mut PgConnection,
        id: i64,
        status: OrderStatus,
        admin_confirm: i16,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET order_status = $2, admin_confirm = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(admin_confirm)
        .execute(tx)
        .await?;

        Ok(())
    }

    /// 在事务中取消订单
    ///
    /// 取消同时清零积分并重置确认标记
    pub async fn mark_cancelled_in_tx(tx: &mut PgConnection, id: i64, reason: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET order_status = 'CANCELLED', redeem_points = 0, admin_confirm = 0,
                cancellation_reason = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(reason)
        .execute(tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl OrderRepositoryTrait for OrderRepository {
    async fn get_order(&self, id: i64) -> Result<Option<Order>> {
        self.get_order(id).await
    }

    async fn get_order_detail(&self, id: i64) -> Result<Option<OrderDetail>> {
        self.get_order_detail(id).await
    }

    async fn list_details_by_user(&self, user_id: i64) -> Result<Vec<OrderDetail>> {
        self.list_details_by_user(user_id).await
    }

    async fn list_details(&self) -> Result<Vec<OrderDetail>> {
        self.list_details().await
    }

    async fn count_orders(&self) -> Result<i64> {
        self.count_orders().await
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<i64> {
        self.count_by_status(status).await
    }
}
