//! User HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::interfaces::http::common::{error_reply, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

use super::dto::*;

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .identity
        .create_account(
            &request.name,
            &request.email,
            &request.phone,
            &request.password,
        )
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = ApiResponse<UserDto>),
        (status = 400, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .identity
        .authenticate(&request.email, &request.password)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state.identity.get_profile(&user_id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    state
        .identity
        .update_profile(&user_id, &request.name, &request.phone)
        .await
        .map_err(error_reply)?;
    let user = state.identity.get_profile(&user_id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(user.into())))
}
