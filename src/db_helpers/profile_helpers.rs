use sqlx::SqlitePool;

use crate::{errors::RequestError, models::User};

use super::get_user_by_username;

async fn follow_edge_exists(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<bool, RequestError> {
    let edge: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .fetch_optional(pool)
            .await?;
    Ok(edge.is_some())
}

pub async fn get_profile_by_username_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    username: &str,
) -> Result<(User, bool), RequestError> {
    let profile = match get_user_by_username(pool, username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let following = match viewer {
        Some(viewer) => follow_edge_exists(pool, viewer, profile.id).await?,
        None => false,
    };
    Ok((profile, following))
}

pub async fn follow_user_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    username: &str,
) -> Result<(User, bool), RequestError> {
    let profile = match get_user_by_username(pool, username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    // Self-follow is suppressed, not an error
    if profile.id == follower_id {
        return Ok((profile, false));
    }

    sqlx::query(
        "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)
         ON CONFLICT (follower_id, followed_id) DO NOTHING",
    )
    .bind(follower_id)
    .bind(profile.id)
    .execute(pool)
    .await?;

    Ok((profile, true))
}

pub async fn unfollow_user_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    username: &str,
) -> Result<(User, bool), RequestError> {
    let profile = match get_user_by_username(pool, username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower_id)
        .bind(profile.id)
        .execute(pool)
        .await?;

    Ok((profile, false))
}
