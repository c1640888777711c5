//! PlacementService 集成测试
//!
//! 使用真实 PostgreSQL 测试批量下单与首单奖励发放。
//! 首单判定和奖励写入是事务内 SQL（EXISTS 检查、流水插入），
//! mock 盖不住，必须打真库。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... \
//!   cargo test --test placement_service_test -- --ignored
//! ```

use order_management::error::OrderError;
use order_management::lock::LockManager;
use order_management::repository::CatalogRepository;
use order_management::service::PlacementService;
use order_management::service::dto::{OrderLine, PlaceOrderRequest};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

// ==================== 辅助函数 ====================

/// DATABASE_URL 未设置时直接 panic，提示补齐环境
fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

/// 创建 PlacementService 实例（真实 CatalogRepository + 数据库锁）
fn setup_placement_service(pool: &PgPool) -> PlacementService<CatalogRepository> {
    let catalog_repo = Arc::new(CatalogRepository::new(pool.clone()));
    let lock_manager = Arc::new(LockManager::with_defaults(None, pool.clone()));
    PlacementService::new(catalog_repo, lock_manager, pool.clone())
}

/// 插入测试用户（幂等，已存在则更新）
async fn seed_test_user(pool: &PgPool, user_id: i64, email: &str) {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password, user_role)
        VALUES ($1, 'IntegTest Architect', $2, 'hashed-password', 'normal')
        ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
        "#,
    )
    .bind(user_id)
    .bind(email)
    .execute(pool)
    .await
    .expect("插入测试用户失败");
}

/// 插入测试产品
async fn seed_test_product(pool: &PgPool, product_id: i64, name: &str, point: i32) {
    sqlx::query(
        r#"
        INSERT INTO products (id, name, code, product_type, point)
        VALUES ($1, $2, $3, 'cement', $4)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            point = EXCLUDED.point
        "#,
    )
    .bind(product_id)
    .bind(name)
    .bind(format!("CODE-{}", product_id))
    .bind(point)
    .execute(pool)
    .await
    .expect("插入测试产品失败");
}

/// 插入测试经销商
async fn seed_test_dealer(pool: &PgPool, dealer_id: i64, name: &str) {
    sqlx::query(
        r#"
        INSERT INTO dealers (id, name, mobile)
        VALUES ($1, $2, '9000000001')
        ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
        "#,
    )
    .bind(dealer_id)
    .bind(name)
    .execute(pool)
    .await
    .expect("插入测试经销商失败");
}

/// 直接插入一条历史订单（跳过业务逻辑，用于构造老用户）
async fn seed_existing_order(pool: &PgPool, user_id: i64, product_id: i64, dealer_id: i64) {
    sqlx::query(
        r#"
        INSERT INTO orders (user_id, product_id, dealer_id, batch_id, quantity,
                            redeem_points, order_status, order_date)
        VALUES ($1, $2, $3, $4, 10, 100, 'PENDING', NOW() - INTERVAL '7 days')
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(dealer_id)
    .bind(Uuid::new_v4())
    .execute(pool)
    .await
    .expect("插入历史订单失败");
}

/// 依外键顺序清掉指定用户的订单与流水
///
/// 目录数据（用户/产品/经销商）由幂等 seed 维护，不删
async fn cleanup_test_data(pool: &PgPool, user_ids: &[i64]) {
    for uid in user_ids {
        sqlx::query("DELETE FROM bonus_point_ledger WHERE user_id = $1")
            .bind(uid)
            .execute(pool)
            .await
            .ok();
    }

    for uid in user_ids {
        sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(uid)
            .execute(pool)
            .await
            .ok();
    }
}

/// 统计用户奖励流水条数
async fn ledger_count(pool: &PgPool, user_id: i64) -> i64 {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM bonus_point_ledger WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
    count.0
}

// ==================== 测试用例 ====================

/// 正常下单：一次请求多条产品行，共享 batch_id，积分按单价计算
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_place_order_creates_batch() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91001;

    cleanup_test_data(&pool, &[user_id]).await;
    seed_test_user(&pool, user_id, "integ_place_batch@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_product(&pool, 92002, "Wall Paint", 8).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let request = PlaceOrderRequest::new(
        user_id,
        93001,
        vec![
            OrderLine {
                product_id: 92001,
                quantity: 60,
            },
            OrderLine {
                product_id: 92002,
                quantity: 5,
            },
        ],
    );

    let resp = svc.place_order(request).await;
    assert!(resp.is_ok(), "下单应成功: {:?}", resp.err());
    let resp = resp.unwrap();

    assert_eq!(resp.orders.len(), 2, "应创建 2 条订单行");
    for order in &resp.orders {
        assert_eq!(order.batch_id, resp.batch_id, "同批订单应共享 batch_id");
    }
    assert_eq!(resp.orders[0].redeem_points, 600, "60 x 10 积分");
    assert_eq!(resp.orders[1].redeem_points, 40, "5 x 8 积分");
    assert_eq!(resp.orders[0].product_name, "Premium Cement");
    assert_eq!(resp.orders[0].dealer_name, "Metro Dealer");

    // 验证数据库记录
    let rows: Vec<(Uuid, String, i16)> = sqlx::query_as(
        "SELECT batch_id, order_status, admin_confirm FROM orders WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    for (batch_id, status, admin_confirm) in &rows {
        assert_eq!(*batch_id, resp.batch_id);
        assert_eq!(status, "PENDING", "新订单应为 PENDING 状态");
        assert_eq!(*admin_confirm, 0);
    }

    cleanup_test_data(&pool, &[user_id]).await;
}

/// 首单且数量达标：发放一条 +2100 奖励流水
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_first_batch_bonus_granted() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91002;

    cleanup_test_data(&pool, &[user_id]).await;
    seed_test_user(&pool, user_id, "integ_place_bonus@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let resp = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            93001,
            vec![OrderLine {
                product_id: 92001,
                quantity: 60,
            }],
        ))
        .await
        .unwrap();

    assert!(resp.bonus_granted, "首单数量达标应发放奖励");

    let rows: Vec<(i32, i16, String)> = sqlx::query_as(
        "SELECT redeem_points, redeem_point_status, description
         FROM bonus_point_ledger WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 1, "应恰好一条奖励流水");
    assert_eq!(rows[0].0, 2100);
    assert_eq!(rows[0].1, 0, "新发放的奖励应为未兑换状态");
    assert_eq!(rows[0].2, "First order bonus");

    cleanup_test_data(&pool, &[user_id]).await;
}

/// 同批多行达标：仍只发放一条奖励
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_single_bonus_for_multi_qualifying_lines() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91003;

    cleanup_test_data(&pool, &[user_id]).await;
    seed_test_user(&pool, user_id, "integ_place_multi@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_product(&pool, 92002, "Wall Paint", 8).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let resp = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            93001,
            vec![
                OrderLine {
                    product_id: 92001,
                    quantity: 60,
                },
                OrderLine {
                    product_id: 92002,
                    quantity: 70,
                },
            ],
        ))
        .await
        .unwrap();

    assert!(resp.bonus_granted);
    assert_eq!(
        ledger_count(&pool, user_id).await,
        1,
        "多行达标也只发一条奖励"
    );

    cleanup_test_data(&pool, &[user_id]).await;
}

/// 首单但数量不达标：不发放奖励
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_no_bonus_below_threshold() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91004;

    cleanup_test_data(&pool, &[user_id]).await;
    seed_test_user(&pool, user_id, "integ_place_below@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let resp = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            93001,
            vec![OrderLine {
                product_id: 92001,
                quantity: 49,
            }],
        ))
        .await
        .unwrap();

    assert!(!resp.bonus_granted, "数量 49 不应触发奖励");
    assert_eq!(ledger_count(&pool, user_id).await, 0);

    cleanup_test_data(&pool, &[user_id]).await;
}

/// 老用户（已有历史订单）：即使数量达标也不发放奖励
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_no_bonus_for_returning_user() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91005;

    cleanup_test_data(&pool, &[user_id]).await;
    seed_test_user(&pool, user_id, "integ_place_return@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;
    seed_existing_order(&pool, user_id, 92001, 93001).await;

    let svc = setup_placement_service(&pool);
    let resp = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            93001,
            vec![OrderLine {
                product_id: 92001,
                quantity: 60,
            }],
        ))
        .await
        .unwrap();

    assert!(!resp.bonus_granted, "非首单不应发放奖励");
    assert_eq!(ledger_count(&pool, user_id).await, 0);

    cleanup_test_data(&pool, &[user_id]).await;
}

/// 空订单行：返回校验错误
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_place_order_empty_lines() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91006;

    seed_test_user(&pool, user_id, "integ_place_empty@test.com").await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let result = svc
        .place_order(PlaceOrderRequest::new(user_id, 93001, vec![]))
        .await;

    assert!(result.is_err());
    assert!(
        matches!(result.unwrap_err(), OrderError::Validation(_)),
        "空订单行应返回 Validation"
    );
}

/// 数量为 0：返回校验错误
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_place_order_zero_quantity() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91007;

    seed_test_user(&pool, user_id, "integ_place_zero@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let result = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            93001,
            vec![OrderLine {
                product_id: 92001,
                quantity: 0,
            }],
        ))
        .await;

    assert!(result.is_err());
    assert!(
        matches!(result.unwrap_err(), OrderError::Validation(_)),
        "数量 0 应返回 Validation"
    );
}

/// 经销商不存在：返回 DealerNotFound
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_place_order_dealer_not_found() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91008;
    let nonexistent_dealer_id = 999999;

    seed_test_user(&pool, user_id, "integ_place_nodealer@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;

    let svc = setup_placement_service(&pool);
    let result = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            nonexistent_dealer_id,
            vec![OrderLine {
                product_id: 92001,
                quantity: 10,
            }],
        ))
        .await;

    assert!(result.is_err());
    assert!(
        matches!(result.unwrap_err(), OrderError::DealerNotFound(id) if id == nonexistent_dealer_id),
        "应返回 DealerNotFound"
    );
}

/// 产品不存在：返回 ProductNotFound，且不写入任何订单
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_place_order_product_not_found() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = 91009;
    let nonexistent_product_id = 999999;

    cleanup_test_data(&pool, &[user_id]).await;
    seed_test_user(&pool, user_id, "integ_place_noproduct@test.com").await;
    seed_test_product(&pool, 92001, "Premium Cement", 10).await;
    seed_test_dealer(&pool, 93001, "Metro Dealer").await;

    let svc = setup_placement_service(&pool);
    let result = svc
        .place_order(PlaceOrderRequest::new(
            user_id,
            93001,
            vec![
                OrderLine {
                    product_id: 92001,
                    quantity: 10,
                },
                OrderLine {
                    product_id: nonexistent_product_id,
                    quantity: 10,
                },
            ],
        ))
        .await;

    assert!(result.is_err());
    assert!(
        matches!(result.unwrap_err(), OrderError::ProductNotFound(id) if id == nonexistent_product_id),
        "应返回 ProductNotFound"
    );

    // 批量下单是原子的，失败时任何订单行都不应落库
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0, "失败的批次不应写入任何订单");

    cleanup_test_data(&pool, &[user_id]).await;
}
