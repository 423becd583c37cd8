use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser},
    data_formats::{LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse, UserWrapper},
    db_helpers::{get_user_by_email, get_user_by_id, insert_user, update_user_in_db},
    errors::RequestError,
};

use super::JsonResult;

type UserJson = UserWrapper<UserResponse>;

// Same message for an unknown email and a bad password, so the endpoint can't
// be used to enumerate accounts.
const BAD_CREDENTIALS: &str = "Email or password is invalid";

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserJson> {
    let user = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or(RequestError::NotAuthorized(BAD_CREDENTIALS))?;

    let is_password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::NotAuthorized(BAD_CREDENTIALS));
    }

    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user, token),
    }))
}

pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { mut user }): Json<UserWrapper<RegisterRequest>>,
) -> JsonResult<UserJson> {
    validate_registration(&user)?;
    user.password = hash_password_argon2(user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;

    let user = insert_user(&pool, &user).await?;
    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user, token),
    }))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    auth: AuthUser,
) -> JsonResult<UserJson> {
    let user = get_user_by_id(&pool, auth.id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;

    // Token is reissued so its expiry window starts fresh
    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user, token),
    }))
}

pub async fn update_user(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user }): Json<UserWrapper<UpdateUserRequest>>,
) -> JsonResult<UserJson> {
    let user = update_user_in_db(&pool, auth.id, user).await?;
    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user, token),
    }))
}

fn validate_registration(user: &RegisterRequest) -> Result<(), RequestError> {
    if user.username.trim().is_empty() {
        return Err(RequestError::Validation("username", "can't be blank"));
    }
    if user.email.trim().is_empty() {
        return Err(RequestError::Validation("email", "can't be blank"));
    }
    if user.password.is_empty() {
        return Err(RequestError::Validation("password", "can't be blank"));
    }
    Ok(())
}
