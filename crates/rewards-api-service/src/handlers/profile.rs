//! 用户资料与银行账户处理器
//!
//! 提供个人资料查询/更新、修改密码和银行账户管理的 API

use axum::{Extension, Json, extract::State};
use tracing::info;
use validator::Validate;

use crate::auth::{Claims, hash_password, verify_password};
use crate::dto::{
    ApiResponse, BankDetailDto, BankDetailRequest, ChangePasswordRequest, ProfileDto,
    UpdateProfileRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 查询个人资料
///
/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<ProfileDto>> {
    let user_id = claims.user_id()?;
    let user = state
        .user_repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(ApiResponse::ok(
        "User profile fetched successfully.",
        ProfileDto::from(user),
    ))
}

/// 更新个人资料
///
/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiResponse<ProfileDto>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    state
        .user_repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    state
        .user_repo
        .update_profile(
            user_id,
            &req.full_name,
            req.mobile_number.as_deref(),
            req.firm_name.as_deref(),
            req.office_address.as_deref(),
        )
        .await?;

    // 回读更新后的资料，带最新 updated_at
    let user = state
        .user_repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    info!(user_id = user_id, "用户资料已更新");
    Ok(ApiResponse::ok(
        "User profile updated successfully.",
        ProfileDto::from(user),
    ))
}

/// 修改密码
///
/// POST /api/profile/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<()>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    let user = state
        .user_repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    if !verify_password(&req.old_password, &user.password)? {
        return Err(ApiError::BadRequest("Old password is incorrect.".to_string()));
    }

    let password_hash = hash_password(&req.new_password)?;
    state.user_repo.update_password(user_id, &password_hash).await?;

    info!(user_id = user_id, "用户密码已修改");
    Ok(ApiResponse::message("Password changed successfully."))
}

/// 新增银行账户
///
/// POST /api/profile/bank-details
///
/// 每个用户仅一条银行账户记录，已存在时提示改用更新
pub async fn add_bank_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BankDetailRequest>,
) -> Result<ApiResponse<BankDetailDto>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    if state.user_repo.get_bank_detail(user_id).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Bank details already exist. Please update instead.".to_string(),
        ));
    }

    let detail = state
        .user_repo
        .create_bank_detail(user_id, &req.account_no, &req.ifsc_code, &req.bank_name)
        .await?;

    info!(user_id = user_id, "银行账户已添加");
    Ok(ApiResponse::ok(
        "Bank details added successfully.",
        BankDetailDto::from(detail),
    ))
}

/// 查询银行账户
///
/// GET /api/profile/bank-details
pub async fn get_bank_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<BankDetailDto>> {
    let user_id = claims.user_id()?;
    let detail = state
        .user_repo
        .get_bank_detail(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No bank details found.".to_string()))?;

    Ok(ApiResponse::ok(
        "Bank details fetched successfully.",
        BankDetailDto::from(detail),
    ))
}

/// 更新银行账户
///
/// PUT /api/profile/bank-details
pub async fn update_bank_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BankDetailRequest>,
) -> Result<ApiResponse<BankDetailDto>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    let detail = state
        .user_repo
        .update_bank_detail(user_id, &req.account_no, &req.ifsc_code, &req.bank_name)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No bank details found. Please add first.".to_string())
        })?;

    info!(user_id = user_id, "银行账户已更新");
    Ok(ApiResponse::ok(
        "Bank details updated successfully.",
        BankDetailDto::from(detail),
    ))
}
