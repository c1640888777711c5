//! 下单服务
//!
//! 处理下单请求的核心业务逻辑，包括：
//! - 请求校验（订单行、数量、经销商、产品）
//! - 批次生成（batch_id 与共享下单时间）
//! - 按行计算可兑换积分并写入订单
//! - 首单奖励判定与流水写入
//! - 每用户锁串行化同一用户的并发下单
//!
//! ## 下单流程
//!
//! 1. 参数校验 -> 2. 加载经销商与产品 -> 3. 获取用户锁
//!    -> 4. 事务内写入（首单判定 + 订单行 + 奖励流水）
//!    -> 5. 释放锁 -> 6. 组装响应

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use rewards_shared::observability::metrics;

use crate::error::{OrderError, Result};
use crate::lock::{self, LockManager};
use crate::models::{Dealer, NewLedgerEntry, NewOrder, OrderStatus, Product};
use crate::repository::{CatalogRepositoryTrait, LedgerRepository, OrderRepository};
use crate::service::bonus;
use crate::service::dto::{PlaceOrderRequest, PlaceOrderResponse, PlacedOrderDto};

/// 事务写入结果
struct PlacedBatch {
    batch_id: Uuid,
    order_date: DateTime<Utc>,
    order_ids: Vec<i64>,
    bonus_granted: bool,
}

/// 下单服务
///
/// 负责下单的完整流程。首单判定与订单写入在同一事务内完成，
/// 事务开启前按用户加锁，同一用户的并发下单在此串行化。
pub struct PlacementService<CR>
where
    CR: CatalogRepositoryTrait,
{
    catalog_repo: Arc<CR>,
    lock_manager: Arc<LockManager>,
    pool: PgPool,
}

impl<CR> PlacementService<CR>
where
    CR: CatalogRepositoryTrait,
{
    pub fn new(catalog_repo: Arc<CR>, lock_manager: Arc<LockManager>, pool: PgPool) -> Self {
        Self {
            catalog_repo,
            lock_manager,
            pool,
        }
    }

    /// 下单
    ///
    /// 完整流程：
    /// 1. 参数校验（至少一行，每行数量 >= 1）
    /// 2. 加载经销商与产品，不存在即拒绝，无任何写入
    /// 3. 获取用户锁 `order:user:{user_id}`
    /// 4. 事务内：首单判定 -> 逐行写入订单 -> 按需写入奖励流水
    /// 5. 释放锁，从已加载的目录数据组装响应
    #[instrument(skip(self, request), fields(
        user_id = %request.user_id,
        dealer_id = %request.dealer_id,
        line_count = request.lines.len()
    ))]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse> {
        let start = Instant::now();

        // 1. 参数校验
        self.validate_request(&request)?;

        // 2. 加载经销商与产品
        let dealer = self
            .catalog_repo
            .get_dealer(request.dealer_id)
            .await?
            .ok_or(OrderError::DealerNotFound(request.dealer_id))?;
        let products = self.load_products(&request).await?;

        // 3. 获取用户锁，事务期间持有
        let lock_key = lock::user_order_key(request.user_id);
        let guard = self.lock_manager.acquire(&lock_key, None).await?;

        // 4. 事务内写入
        let outcome = self.execute_place(&request, &products).await;

        if let Err(e) = guard.release().await {
            warn!(error = %e, "释放用户锁失败，锁将依赖 TTL 过期");
        }

        let batch = match outcome {
            Ok(batch) => batch,
            Err(e) => {
                metrics::record_order_placed("error", false, start.elapsed().as_secs_f64());
                return Err(e);
            }
        };

        metrics::record_order_placed("success", batch.bonus_granted, start.elapsed().as_secs_f64());
        if batch.bonus_granted {
            metrics::record_bonus_entry("grant");
        }

        info!(
            user_id = %request.user_id,
            batch_id = %batch.batch_id,
            line_count = batch.order_ids.len(),
            bonus_granted = batch.bonus_granted,
            "下单成功"
        );

        // 5. 组装响应
        build_response(&request, &dealer, &products, batch)
    }

    // ==================== 内部实现 ====================

    /// 入参校验
    fn validate_request(&self, request: &PlaceOrderRequest) -> Result<()> {
        if request.lines.is_empty() {
            return Err(OrderError::Validation(
                "At least one order line is required.".to_string(),
            ));
        }

        for line in &request.lines {
            if line.quantity < 1 {
                return Err(OrderError::Validation(format!(
                    "Quantity must be at least 1 for product {}.",
                    line.product_id
                )));
            }
        }

        Ok(())
    }

    /// 批量加载产品并校验存在性，避免逐行查询
    async fn load_products(&self, request: &PlaceOrderRequest) -> Result<HashMap<i64, Product>> {
        let mut ids: Vec<i64> = request.lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let products = self.catalog_repo.get_products_by_ids(&ids).await?;
        let map: HashMap<i64, Product> = products.into_iter().map(|p| (p.id, p)).collect();

        for id in &ids {
            if !map.contains_key(id) {
                return Err(OrderError::ProductNotFound(*id));
            }
        }

        Ok(map)
    }

    /// 下单事务，单事务内依次完成：
    /// - 首单判定（在本批任何写入之前求值，同批所有行共享资格窗口）
    /// - 逐行插入订单，共享 batch_id 与 order_date
    /// - 满足条件时追加一条 +2100 奖励流水
    async fn execute_place(
        &self,
        request: &PlaceOrderRequest,
        products: &HashMap<i64, Product>,
    ) -> Result<PlacedBatch> {
        let mut tx = self.pool.begin().await?;

        // 4.1 首单判定先于任何写入
        let has_prior_orders =
            OrderRepository::has_any_orders_in_tx(&mut tx, request.user_id).await?;

        // 4.2 一次下单一个批次，所有行共享批次标识与下单时间
        let batch_id = Uuid::new_v4();
        let order_date = Utc::now();

        let mut order_ids = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let product = products
                .get(&line.product_id)
                .ok_or(OrderError::ProductNotFound(line.product_id))?;

            let new_order = NewOrder {
                user_id: request.user_id,
                product_id: line.product_id,
                dealer_id: request.dealer_id,
                batch_id,
                quantity: line.quantity,
                redeem_points: line.quantity * product.point,
                order_date,
            };
            let id = OrderRepository::create_in_tx(&mut tx, &new_order).await?;
            order_ids.push(id);
        }

        // 4.3 整批插入完成后最多追加一条奖励流水
        let quantities: Vec<i32> = request.lines.iter().map(|l| l.quantity).collect();
        let bonus_granted = bonus::grant_on_placement(has_prior_orders, &quantities);
        if bonus_granted {
            let entry = NewLedgerEntry::grant(
                request.user_id,
                bonus::BONUS_POINTS,
                bonus::GRANT_DESCRIPTION,
            );
            LedgerRepository::create_in_tx(&mut tx, &entry).await?;
        }

        tx.commit().await?;

        Ok(PlacedBatch {
            batch_id,
            order_date,
            order_ids,
            bonus_granted,
        })
    }
}

/// 组装下单响应
///
/// 产品与经销商展示字段来自下单前加载的目录数据，不再回查数据库
fn build_response(
    request: &PlaceOrderRequest,
    dealer: &Dealer,
    products: &HashMap<i64, Product>,
    batch: PlacedBatch,
) -> Result<PlaceOrderResponse> {
    let mut orders = Vec::with_capacity(request.lines.len());

    for (line, order_id) in request.lines.iter().zip(batch.order_ids.iter()) {
        let product = products
            .get(&line.product_id)
            .ok_or(OrderError::ProductNotFound(line.product_id))?;

        orders.push(PlacedOrderDto {
            id: *order_id,
            batch_id: batch.batch_id,
            product_id: product.id,
            product_name: product.name.clone(),
            product_code: product.code.clone(),
            product_type: product.product_type.clone(),
            dealer_name: dealer.name.clone(),
            quantity: line.quantity,
            redeem_points: line.quantity * product.point,
            order_status: OrderStatus::Pending,
            order_date: batch.order_date,
        });
    }

    Ok(PlaceOrderResponse {
        batch_id: batch.batch_id,
        bonus_granted: batch.bonus_granted,
        orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::dto::OrderLine;

    fn create_test_product(id: i64, point: i32) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            code: format!("P-{}", id),
            product_type: "Cement".to_string(),
            point,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_test_dealer() -> Dealer {
        Dealer {
            id: 7,
            name: "Acme Traders".to_string(),
            mobile: Some("9000000001".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_response_resolves_display_fields() {
        let request = PlaceOrderRequest::new(
            42,
            7,
            vec![
                OrderLine {
                    product_id: 101,
                    quantity: 60,
                },
                OrderLine {
                    product_id: 102,
                    quantity: 5,
                },
            ],
        );
        let dealer = create_test_dealer();
        let mut products = HashMap::new();
        products.insert(101, create_test_product(101, 10));
        products.insert(102, create_test_product(102, 3));

        let batch = PlacedBatch {
            batch_id: Uuid::new_v4(),
            order_date: Utc::now(),
            order_ids: vec![1, 2],
            bonus_granted: true,
        };

        let response = build_response(&request, &dealer, &products, batch).unwrap();

        assert!(response.bonus_granted);
        assert_eq!(response.orders.len(), 2);
        assert_eq!(response.orders[0].id, 1);
        assert_eq!(response.orders[0].product_name, "Product 101");
        assert_eq!(response.orders[0].redeem_points, 600);
        assert_eq!(response.orders[0].order_status, OrderStatus::Pending);
        assert_eq!(response.orders[1].redeem_points, 15);
        assert_eq!(response.orders[1].dealer_name, "Acme Traders");
        // 同批所有行共享批次标识与下单时间
        assert_eq!(response.orders[0].batch_id, response.orders[1].batch_id);
        assert_eq!(response.orders[0].order_date, response.orders[1].order_date);
    }

    #[test]
    fn test_build_response_missing_product() {
        let request = PlaceOrderRequest::new(
            42,
            7,
            vec![OrderLine {
                product_id: 999,
                quantity: 1,
            }],
        );
        let dealer = create_test_dealer();
        let products = HashMap::new();

        let batch = PlacedBatch {
            batch_id: Uuid::new_v4(),
            order_date: Utc::now(),
            order_ids: vec![1],
            bonus_granted: false,
        };

        let result = build_response(&request, &dealer, &products, batch);
        assert!(matches!(result, Err(OrderError::ProductNotFound(999))));
    }
}
