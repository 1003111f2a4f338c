/*
 * Responsibility
 * - posts / tags テーブル向け操作 (blog)
 * - 一覧の tag 絞り込みと並び替え
 * - 可視性の判定はしない (policy 側の責務)
 */
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::Db;

#[derive(Debug, Clone, Serialize)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub restricted: bool,
    pub share_token: Option<String>,
    pub user_id: i64,
    #[serde(skip)]
    pub tag_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    #[default]
    Newest,
    Oldest,
    Title,
    TitleDesc,
}

impl PostSort {
    /// Unknown values fall back to newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            Some("title") => Self::Title,
            Some("titleDesc") => Self::TitleDesc,
            _ => Self::Newest,
        }
    }

    fn compare(&self, a: &PostRow, b: &PostRow) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
            Self::Oldest => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            Self::Title => a.title.cmp(&b.title).then(a.id.cmp(&b.id)),
            Self::TitleDesc => b.title.cmp(&a.title).then(b.id.cmp(&a.id)),
        }
    }
}

#[derive(Debug, Default)]
pub struct PostQuery<'a> {
    pub sort: PostSort,
    /// Tag id, or tag name when it isn't numeric.
    pub tag: Option<&'a str>,
    /// Restrict to posts written by these users.
    pub authors: Option<&'a [i64]>,
}

#[derive(Debug)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub restricted: bool,
    pub share_token: Option<String>,
    pub user_id: i64,
    pub tags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `None` means the field was absent from the request, which also drops
    /// any share token the post had.
    pub restricted: Option<bool>,
    /// Used only if the post becomes restricted and has no token yet.
    pub fresh_share_token: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub fn list(db: &Db, query: &PostQuery<'_>) -> Vec<PostRow> {
    let tag_id = query.tag.and_then(|tag| resolve_tag_filter(db, tag));
    if query.tag.is_some() && tag_id.is_none() {
        return Vec::new();
    }

    let mut posts = db.posts.filter(|p| {
        tag_id.is_none_or(|t| p.tag_ids.contains(&t))
            && query.authors.is_none_or(|authors| authors.contains(&p.user_id))
    });
    posts.sort_by(|a, b| query.sort.compare(a, b));
    posts
}

/// Newest first.
pub fn list_by_user(db: &Db, user_id: i64) -> Vec<PostRow> {
    let mut posts = db.posts.filter(|p| p.user_id == user_id);
    posts.sort_by(|a, b| PostSort::Newest.compare(a, b));
    posts
}

pub fn get(db: &Db, id: i64) -> Option<PostRow> {
    db.posts.get(id)
}

pub fn find_by_share_token(db: &Db, token: &str) -> Option<PostRow> {
    db.posts
        .find(|p| p.share_token.as_deref() == Some(token))
}

pub fn create(db: &Db, new: NewPost) -> PostRow {
    let tag_ids = ensure_tags(db, &new.tags);
    let now = Utc::now();

    db.posts.insert_with(|id| PostRow {
        id,
        title: new.title,
        content: new.content,
        restricted: new.restricted,
        share_token: new.share_token,
        user_id: new.user_id,
        tag_ids,
        created_at: now,
        updated_at: now,
    })
}

pub fn update(db: &Db, id: i64, changes: PostChanges) -> Option<PostRow> {
    let tag_ids = changes.tags.as_deref().map(|names| ensure_tags(db, names));

    db.posts.update(id, |post| {
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }

        match changes.restricted {
            Some(restricted) => {
                post.restricted = restricted;
                if restricted && post.share_token.is_none() {
                    post.share_token = changes.fresh_share_token;
                }
            }
            None => post.share_token = None,
        }

        if let Some(tag_ids) = tag_ids {
            post.tag_ids = tag_ids;
        }
        post.updated_at = Utc::now();
        post.clone()
    })
}

/// Deletes the post and its comments.
pub fn delete(db: &Db, id: i64) -> bool {
    if db.posts.delete(id).is_none() {
        return false;
    }
    db.comments.delete_where(|c| c.post_id == id);
    true
}

pub fn tags_of(db: &Db, post: &PostRow) -> Vec<TagRow> {
    post.tag_ids.iter().filter_map(|id| db.tags.get(*id)).collect()
}

/// Every tag with the number of posts carrying it, by name.
pub fn tag_counts(db: &Db) -> Vec<(TagRow, usize)> {
    let mut tags: Vec<(TagRow, usize)> = db
        .tags
        .all()
        .into_iter()
        .map(|tag| {
            let count = db.posts.count(|p| p.tag_ids.contains(&tag.id));
            (tag, count)
        })
        .collect();
    tags.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));
    tags
}

/// Tag ids for `names`, creating missing tags. Blank and repeated names are skipped.
fn ensure_tags(db: &Db, names: &[String]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let tag = db.tags.find_or_insert(
            |t| t.name == name,
            |id| TagRow {
                id,
                name: name.to_string(),
                created_at: Utc::now(),
            },
        );
        if !ids.contains(&tag.id) {
            ids.push(tag.id);
        }
    }
    ids
}

fn resolve_tag_filter(db: &Db, tag: &str) -> Option<i64> {
    match tag.parse::<i64>() {
        Ok(id) => db.tags.get(id).map(|t| t.id),
        Err(_) => db.tags.find(|t| t.name == tag).map(|t| t.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(db: &Db, user_id: i64, title: &str, tags: &[&str]) -> PostRow {
        create(
            db,
            NewPost {
                title: title.into(),
                content: "c".into(),
                restricted: false,
                share_token: None,
                user_id,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        )
    }

    #[test]
    fn tags_are_shared_and_deduplicated() {
        let db = Db::new();
        let a = post(&db, 1, "a", &["rust", "web", "rust", " "]);
        let b = post(&db, 1, "b", &["rust"]);

        assert_eq!(a.tag_ids.len(), 2);
        assert_eq!(b.tag_ids, a.tag_ids[..1]);

        let counts: Vec<(String, usize)> = tag_counts(&db)
            .into_iter()
            .map(|(t, n)| (t.name, n))
            .collect();
        assert_eq!(counts, [("rust".to_string(), 2), ("web".to_string(), 1)]);
    }

    #[test]
    fn list_filters_by_tag_id_or_name_and_sorts() {
        let db = Db::new();
        post(&db, 1, "b", &["x"]);
        post(&db, 2, "a", &["x"]);
        post(&db, 2, "c", &[]);

        let titles = |q: PostQuery<'_>| -> Vec<String> {
            list(&db, &q).into_iter().map(|p| p.title).collect()
        };

        assert_eq!(titles(PostQuery::default()), ["c", "a", "b"]);
        assert_eq!(
            titles(PostQuery { sort: PostSort::Title, tag: Some("x"), ..Default::default() }),
            ["a", "b"]
        );
        assert_eq!(
            titles(PostQuery { tag: Some("1"), authors: Some(&[1][..]), ..Default::default() }),
            ["b"]
        );
        assert!(titles(PostQuery { tag: Some("missing"), ..Default::default() }).is_empty());
    }

    #[test]
    fn absent_restricted_flag_clears_the_share_token() {
        let db = Db::new();
        let p = post(&db, 1, "t", &[]);

        let restricted = update(
            &db,
            p.id,
            PostChanges {
                restricted: Some(true),
                fresh_share_token: Some("ab12".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(restricted.share_token.as_deref(), Some("ab12"));

        let kept = update(
            &db,
            p.id,
            PostChanges {
                restricted: Some(true),
                fresh_share_token: Some("ffff".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(kept.share_token.as_deref(), Some("ab12"));

        let cleared = update(&db, p.id, PostChanges::default()).unwrap();
        assert_eq!(cleared.share_token, None);
        assert!(cleared.restricted);
    }
}
