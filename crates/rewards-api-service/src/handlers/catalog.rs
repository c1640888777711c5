//! 产品与经销商目录处理器
//!
//! 目录数据读多写少，经 Redis 缓存，缓存不可用时回退数据库

use std::time::Duration;

use axum::extract::{Path, State};
use rewards_shared::cache::CacheKey;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::dto::{ApiResponse, DealerDto, ProductDto, ProductOptionDto};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 目录缓存过期时间
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

/// 带回退的缓存读取
///
/// 缓存命中直接返回；未命中或缓存故障时走 loader，并尽力回写缓存
async fn cached<T, F, Fut>(state: &AppState, key: &str, loader: F) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<Vec<T>>>,
{
    match state.cache.get::<Vec<T>>(key).await {
        Ok(Some(values)) => return Ok(values),
        Ok(None) => {}
        Err(e) => warn!(key = key, error = %e, "读取目录缓存失败，回退数据库"),
    }

    let values = loader().await?;

    if let Err(e) = state.cache.set(key, &values, CATALOG_CACHE_TTL).await {
        warn!(key = key, error = %e, "写入目录缓存失败");
    }

    Ok(values)
}

/// 产品列表
///
/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> Result<ApiResponse<Vec<ProductDto>>> {
    let products = cached(&state, &CacheKey::products(), || async {
        let products = state.catalog_repo.list_products().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    })
    .await?;

    Ok(ApiResponse::ok("Products fetched successfully.", products))
}

/// 按类型查询产品下拉选项
///
/// GET /api/products/by-type/{product_type}
///
/// 选项标签格式为 "{名称} - {编码} - {积分}"，该类型下无产品时返回 404
pub async fn list_products_by_type(
    State(state): State<AppState>,
    Path(product_type): Path<String>,
) -> Result<ApiResponse<Vec<ProductOptionDto>>> {
    let options = cached(
        &state,
        &CacheKey::products_by_type(&product_type),
        || async {
            let products = state
                .catalog_repo
                .list_products_by_type(&product_type)
                .await?;
            Ok(products.into_iter().map(ProductOptionDto::from).collect())
        },
    )
    .await?;

    if options.is_empty() {
        return Err(ApiError::NotFound(
            "No products found for the given type.".to_string(),
        ));
    }

    Ok(ApiResponse::ok("Product Fetch successfully.", options))
}

/// 经销商列表
///
/// GET /api/dealers
pub async fn list_dealers(State(state): State<AppState>) -> Result<ApiResponse<Vec<DealerDto>>> {
    let dealers = cached(&state, &CacheKey::dealers(), || async {
        let dealers = state.catalog_repo.list_dealers().await?;
        Ok(dealers.into_iter().map(DealerDto::from).collect())
    })
    .await?;

    Ok(ApiResponse::ok("Dealers Fetch successfully.", dealers))
}
