use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{ProfileResponse, ProfileWrapper},
    db_helpers::{follow_user_in_db, get_profile_by_username_in_db, unfollow_user_in_db},
};

use super::JsonResult;

pub async fn get_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let (profile, following) =
        get_profile_by_username_in_db(&pool, maybe_user.get_id(), &username).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile, following),
    }))
}

pub async fn follow_profile(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let (profile, following) = follow_user_in_db(&pool, auth.id, &username).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile, following),
    }))
}

pub async fn unfollow_profile(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let (profile, following) = unfollow_user_in_db(&pool, auth.id, &username).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile, following),
    }))
}
