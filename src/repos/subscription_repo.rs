/*
 * Responsibility
 * - subscriptions テーブル向け操作 (blog)
 * - (subscriber, subscribed_to) の組は一意
 */
use chrono::{DateTime, Utc};

use crate::repos::{Db, error::RepoError};

#[derive(Debug, Clone)]
pub struct SubscriptionRow {
    pub id: i64,
    pub subscriber_id: i64,
    pub subscribed_to_id: i64,
    pub created_at: DateTime<Utc>,
}

pub fn is_subscribed(db: &Db, subscriber_id: i64, subscribed_to_id: i64) -> bool {
    db.subscriptions
        .find(|s| s.subscriber_id == subscriber_id && s.subscribed_to_id == subscribed_to_id)
        .is_some()
}

pub fn subscribe(db: &Db, subscriber_id: i64, subscribed_to_id: i64) -> Result<SubscriptionRow, RepoError> {
    db.subscriptions.insert_unique(
        |s| s.subscriber_id == subscriber_id && s.subscribed_to_id == subscribed_to_id,
        |id| SubscriptionRow {
            id,
            subscriber_id,
            subscribed_to_id,
            created_at: Utc::now(),
        },
    )
}

/// `false` when there was nothing to remove.
pub fn unsubscribe(db: &Db, subscriber_id: i64, subscribed_to_id: i64) -> bool {
    db.subscriptions
        .delete_where(|s| s.subscriber_id == subscriber_id && s.subscribed_to_id == subscribed_to_id)
        > 0
}

/// Ids of the users `subscriber_id` follows.
pub fn followed_ids(db: &Db, subscriber_id: i64) -> Vec<i64> {
    db.subscriptions
        .filter(|s| s.subscriber_id == subscriber_id)
        .into_iter()
        .map(|s| s.subscribed_to_id)
        .collect()
}

pub fn subscriber_count(db: &Db, user_id: i64) -> usize {
    db.subscriptions.count(|s| s.subscribed_to_id == user_id)
}

pub fn subscription_count(db: &Db, user_id: i64) -> usize {
    db.subscriptions.count(|s| s.subscriber_id == user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_unique_and_directional() {
        let db = Db::new();
        subscribe(&db, 1, 2).unwrap();
        assert!(matches!(subscribe(&db, 1, 2), Err(RepoError::Conflict)));
        subscribe(&db, 2, 1).unwrap();

        assert!(is_subscribed(&db, 1, 2));
        assert_eq!(subscriber_count(&db, 2), 1);
        assert_eq!(subscription_count(&db, 1), 1);
        assert_eq!(followed_ids(&db, 1), [2]);

        assert!(unsubscribe(&db, 1, 2));
        assert!(!unsubscribe(&db, 1, 2));
        assert!(!is_subscribed(&db, 1, 2));
        assert!(is_subscribed(&db, 2, 1));
    }
}
