/*
 * Responsibility
 * - blog の request/response DTO
 * - post / comment に著者情報と tag を付けた表示用の形
 */
use serde::{Deserialize, Serialize};

use crate::api::common::dto::present;
use crate::repos::comment_repo::CommentRow;
use crate::repos::post_repo::{PostRow, TagRow};
use crate::repos::user_repo::UserRow;

#[derive(Debug, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for Author {
    fn from(u: UserRow) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Commenter {
    pub id: i64,
    pub name: String,
}

/// A post as clients see it: the row, its tags, and who wrote it.
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: PostRow,
    pub tags: Vec<TagRow>,
    pub user: Option<Author>,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: CommentRow,
    pub user: Option<Commenter>,
}

#[derive(Debug, Serialize)]
pub struct TagCount {
    #[serde(flatten)]
    pub tag: TagRow,
    pub post_count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub restricted: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl CreatePostRequest {
    /// `(title, content)` when both are present.
    pub fn validate(&self) -> Result<(&str, &str), &'static str> {
        match (present(&self.title), present(&self.content)) {
            (Some(title), Some(content)) => Ok((title, content)),
            _ => Err("Заголовок и содержание обязательны"),
        }
    }
}

/// Partial update. A missing `restricted` drops the post's share link.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub restricted: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<&str, &'static str> {
        present(&self.content).ok_or("Содержание комментария обязательно")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_needs_title_and_content() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(req.validate(), Err("Заголовок и содержание обязательны"));

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"t","content":"c","tags":["a"]}"#).unwrap();
        assert_eq!(req.validate(), Ok(("t", "c")));
    }

    #[test]
    fn whitespace_comment_is_rejected() {
        let req = CommentRequest {
            content: Some(" \n ".into()),
        };
        assert!(req.validate().is_err());
    }
}
