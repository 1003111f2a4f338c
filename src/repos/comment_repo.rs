/*
 * Responsibility
 * - comments テーブル向け操作 (blog)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::Db;

#[derive(Debug, Clone, Serialize)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Oldest first, so threads read top to bottom.
pub fn list_for_post(db: &Db, post_id: i64) -> Vec<CommentRow> {
    let mut comments = db.comments.filter(|c| c.post_id == post_id);
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    comments
}

pub fn create(db: &Db, post_id: i64, user_id: i64, content: &str) -> CommentRow {
    db.comments.insert_with(|id| CommentRow {
        id,
        post_id,
        user_id,
        content: content.to_string(),
        created_at: Utc::now(),
    })
}
