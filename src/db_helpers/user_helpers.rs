use sqlx::{Sqlite, SqlitePool};

use crate::{
    authentication::hash_password_argon2,
    data_formats::{RegisterRequest, UpdateUserRequest},
    errors::RequestError,
    models::User,
};

use super::{get_user_by_email, get_user_by_id, get_user_by_username, QueryBuilder};

/// Inserts a new account. Email is checked before username so the first
/// conflicting field wins, matching the registration contract. The password
/// must already be hashed by the caller.
pub async fn insert_user(pool: &SqlitePool, user: &RegisterRequest) -> Result<User, RequestError> {
    if get_user_by_email(pool, &user.email).await?.is_some() {
        return Err(RequestError::Conflict("email", "Email is already taken"));
    }
    if get_user_by_username(pool, &user.username).await?.is_some() {
        return Err(RequestError::Conflict(
            "username",
            "Username is already taken",
        ));
    }

    let user = sqlx::query_as::<Sqlite, User>(
        "INSERT INTO users (email, username, password)
         VALUES ($1, $2, $3)
         RETURNING id, username, email, password, bio, image, created_at",
    )
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateUserRequest {
        email,
        bio,
        image,
        username,
        password,
    }: UpdateUserRequest,
) -> Result<User, RequestError> {
    let current = match get_user_by_id(pool, id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    // New email/username must not collide with a different existing user
    if let Some(email) = &email {
        if *email != current.email {
            if let Some(existing) = get_user_by_email(pool, email).await? {
                if existing.id != id {
                    return Err(RequestError::Conflict("email", "Email is already taken"));
                }
            }
        }
    }
    if let Some(username) = &username {
        if *username != current.username {
            if let Some(existing) = get_user_by_username(pool, username).await? {
                if existing.id != id {
                    return Err(RequestError::Conflict(
                        "username",
                        "Username is already taken",
                    ));
                }
            }
        }
    }

    let password = match password {
        Some(password) => Some(
            hash_password_argon2(password)
                .await
                .map_err(|_| RequestError::ServerError)?,
        ),
        None => None,
    };

    let (query, params) = QueryBuilder::new("UPDATE users SET ", ", ")
        .add_param("email", email)
        .add_param("bio", bio)
        .add_param("image", image)
        .add_param("username", username)
        .add_param("password", password)
        .build();
    if !params.is_empty() {
        let query = format!("{query} WHERE id = ${}", params.len() + 1);
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(id).execute(pool).await?;
    }

    match get_user_by_id(pool, id).await? {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("User not found")),
    }
}
