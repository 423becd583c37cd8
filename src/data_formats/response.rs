use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Article, Comment, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProfileResponse {
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    pub following: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ArticleResponse {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(rename = "tagList")]
    pub tag_list: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub favorited: bool,
    #[serde(rename = "favoritesCount")]
    pub favorites_count: i64,
    pub author: ProfileResponse,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub body: String,
    pub author: ProfileResponse,
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            bio,
            image,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            username,
            email,
            bio: bio.unwrap_or_default(),
            image,
            token,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        User {
            username,
            bio,
            image,
            ..
        }: User,
        following: bool,
    ) -> Self {
        ProfileResponse {
            username,
            bio: bio.unwrap_or_default(),
            image,
            following,
        }
    }
}

impl CommentResponse {
    pub fn new(
        Comment {
            id,
            body,
            created_at,
            updated_at,
            author_username,
            author_bio,
            author_image,
            following,
            ..
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            body,
            author: ProfileResponse {
                username: author_username,
                bio: author_bio.unwrap_or_default(),
                image: author_image,
                following,
            },
        }
    }
}

impl ArticleResponse {
    pub fn new(
        Article {
            slug,
            title,
            description,
            body,
            tag_list,
            created_at,
            updated_at,
            favorited,
            favorites_count,
            author_username,
            author_bio,
            author_image,
            following,
            ..
        }: Article,
    ) -> Self {
        // group_concat yields NULL for an untagged article
        let tag_list = tag_list
            .map(|tags| tags.split(',').map(|s| s.to_string()).collect())
            .unwrap_or_default();
        ArticleResponse {
            slug,
            title,
            description,
            body,
            tag_list,
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            favorited,
            favorites_count,
            author: ProfileResponse {
                username: author_username,
                bio: author_bio.unwrap_or_default(),
                image: author_image,
                following,
            },
        }
    }
}
