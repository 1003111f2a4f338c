/*
 * Responsibility
 * - users テーブル向け操作 (3 アプリ共通)
 * - email の一意性は lock 内で検査する
 * - 削除時は所有する行も連鎖削除する
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::Role;
use crate::repos::{Db, error::RepoError};

#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    /// Only shop accounts carry a role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<Role>,
}

#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Newest first.
pub fn list(db: &Db) -> Vec<UserRow> {
    newest_first(db.users.all())
}

pub fn list_by_role(db: &Db, role: Role) -> Vec<UserRow> {
    newest_first(db.users.filter(|u| u.role() == role))
}

pub fn get(db: &Db, id: i64) -> Option<UserRow> {
    db.users.get(id)
}

pub fn find_by_email(db: &Db, email: &str) -> Option<UserRow> {
    db.users.find(|u| u.email == email)
}

pub fn create(db: &Db, new: NewUser) -> Result<UserRow, RepoError> {
    let now = Utc::now();
    db.users.insert_unique(
        |u| u.email == new.email,
        |id| UserRow {
            id,
            name: new.name.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            role: new.role,
            created_at: now,
            updated_at: now,
        },
    )
}

/// `Ok(None)` when the user doesn't exist, `Conflict` when the new email is taken.
pub fn update(db: &Db, id: i64, changes: UserChanges) -> Result<Option<UserRow>, RepoError> {
    let UserChanges {
        name,
        email,
        password_hash,
        role,
    } = changes;

    db.users.update_unique(
        id,
        |other| email.as_deref() == Some(other.email.as_str()),
        |user| {
            if let Some(name) = name {
                user.name = name;
            }
            if let Some(email) = email.clone() {
                user.email = email;
            }
            if let Some(hash) = password_hash {
                user.password_hash = hash;
            }
            if let Some(role) = role {
                user.role = Some(role);
            }
            user.updated_at = Utc::now();
            user.clone()
        },
    )
}

/// Removes the user and everything that belongs to them.
pub fn delete(db: &Db, id: i64) -> bool {
    if db.users.delete(id).is_none() {
        return false;
    }

    let post_ids: Vec<i64> = db.posts.filter(|p| p.user_id == id).iter().map(|p| p.id).collect();
    db.posts.delete_where(|p| p.user_id == id);
    db.comments
        .delete_where(|c| c.user_id == id || post_ids.contains(&c.post_id));
    db.subscriptions
        .delete_where(|s| s.subscriber_id == id || s.subscribed_to_id == id);

    let rental_ids: Vec<i64> = db.rentals.filter(|r| r.user_id == id).iter().map(|r| r.id).collect();
    db.purchases.delete_where(|p| p.user_id == id);
    db.rentals.delete_where(|r| r.user_id == id);
    db.rental_notifications
        .delete_where(|n| rental_ids.contains(&n.rental_id));

    let travel_ids: Vec<i64> = db.travels.filter(|t| t.user_id == id).iter().map(|t| t.id).collect();
    db.travels.delete_where(|t| t.user_id == id);
    db.places.delete_where(|p| travel_ids.contains(&p.travel_id));

    tracing::debug!(user_id = id, "user deleted with dependents");
    true
}

fn newest_first(mut users: Vec<UserRow>) -> Vec<UserRow> {
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    users
}
