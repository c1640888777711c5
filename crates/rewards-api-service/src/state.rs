//! 处理器共享的依赖集合

use std::sync::Arc;

use order_management::{
    CatalogRepository, CompanyRepository, LedgerRepository, LifecycleService, LockManager,
    OrderRepository, PlacementService, SummaryService, UserRepository,
};
use rewards_shared::cache::Cache;
use sqlx::PgPool;

use crate::auth::{JwtConfig, JwtManager};

/// 应用状态，连接池、缓存、仓储与服务经 Arc 在处理器间共享
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: Arc<Cache>,
    /// JWT 管理器
    pub jwt_manager: Arc<JwtManager>,
    /// 用户仓储
    pub user_repo: Arc<UserRepository>,
    /// 产品/经销商目录仓储
    pub catalog_repo: Arc<CatalogRepository>,
    /// 订单仓储
    pub order_repo: Arc<OrderRepository>,
    /// 奖励流水仓储
    pub ledger_repo: Arc<LedgerRepository>,
    /// 公司信息仓储
    pub company_repo: Arc<CompanyRepository>,
    /// 下单服务
    pub placement_service: Arc<PlacementService<CatalogRepository>>,
    /// 订单生命周期服务
    pub lifecycle_service: Arc<LifecycleService<OrderRepository>>,
    /// 积分汇总服务
    pub summary_service: Arc<SummaryService<OrderRepository, LedgerRepository>>,
}

impl AppState {
    /// 装配仓储与服务
    ///
    /// `redis_client` 为 None 时锁竞争全部落在 distributed_locks 表上
    pub fn new(
        pool: PgPool,
        cache: Arc<Cache>,
        redis_client: Option<redis::Client>,
        jwt_config: JwtConfig,
    ) -> Self {
        let jwt_manager = Arc::new(JwtManager::new(jwt_config));

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let catalog_repo = Arc::new(CatalogRepository::new(pool.clone()));
        let order_repo = Arc::new(OrderRepository::new(pool.clone()));
        let ledger_repo = Arc::new(LedgerRepository::new(pool.clone()));
        let company_repo = Arc::new(CompanyRepository::new(pool.clone()));

        let lock_manager = Arc::new(LockManager::with_defaults(redis_client, pool.clone()));

        let placement_service = Arc::new(PlacementService::new(
            catalog_repo.clone(),
            lock_manager.clone(),
            pool.clone(),
        ));
        let lifecycle_service = Arc::new(LifecycleService::new(
            order_repo.clone(),
            lock_manager.clone(),
            pool.clone(),
        ));
        let summary_service = Arc::new(SummaryService::new(
            order_repo.clone(),
            ledger_repo.clone(),
        ));

        Self {
            pool,
            cache,
            jwt_manager,
            user_repo,
            catalog_repo,
            order_repo,
            ledger_repo,
            company_repo,
            placement_service,
            lifecycle_service,
            summary_service,
        }
    }
}
