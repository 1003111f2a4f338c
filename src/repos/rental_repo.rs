/*
 * Responsibility
 * - purchases / rentals / rental_notifications テーブル向け操作 (shop)
 * - 期限切れ・期限間近の抽出とリマインダー記録 (送信はしない)
 */
use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

use crate::repos::Db;

pub const RENTAL_ACTIVE: &str = "active";
pub const NOTIFICATION_REMINDER: &str = "reminder";

/// How far ahead a rental counts as "expiring".
pub const EXPIRING_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRow {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub quantity: i64,
    /// Total paid, unit price times quantity.
    pub price: f64,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RentalRow {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub rental_period: RentalPeriod,
    pub rental_price: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RentalNotificationRow {
    pub id: i64,
    pub rental_id: i64,
    pub notification_type: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RentalPeriod {
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl RentalPeriod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "2weeks" => Some(Self::TwoWeeks),
            "1month" => Some(Self::OneMonth),
            "3months" => Some(Self::ThreeMonths),
            _ => None,
        }
    }

    /// When a rental starting at `start` is due back.
    pub fn end_date(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        let end = match self {
            Self::TwoWeeks => Some(start + Duration::weeks(2)),
            Self::OneMonth => start.checked_add_months(Months::new(1)),
            Self::ThreeMonths => start.checked_add_months(Months::new(3)),
        };
        // Month arithmetic only fails at the far end of the calendar.
        end.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

pub fn create_purchase(db: &Db, user_id: i64, book_id: i64, quantity: i64, price: f64) -> PurchaseRow {
    db.purchases.insert_with(|id| PurchaseRow {
        id,
        user_id,
        book_id,
        quantity,
        price,
        purchase_date: Utc::now(),
    })
}

pub fn create_rental(
    db: &Db,
    user_id: i64,
    book_id: i64,
    period: RentalPeriod,
    rental_price: f64,
    start: DateTime<Utc>,
) -> RentalRow {
    db.rentals.insert_with(|id| RentalRow {
        id,
        user_id,
        book_id,
        rental_period: period,
        rental_price,
        start_date: start,
        end_date: period.end_date(start),
        status: RENTAL_ACTIVE.to_string(),
        created_at: start,
    })
}

/// Newest purchase first.
pub fn purchases_of(db: &Db, user_id: i64) -> Vec<PurchaseRow> {
    let mut rows = db.purchases.filter(|p| p.user_id == user_id);
    rows.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date).then(b.id.cmp(&a.id)));
    rows
}

/// Most recently started first.
pub fn rentals_of(db: &Db, user_id: i64) -> Vec<RentalRow> {
    let mut rows = db.rentals.filter(|r| r.user_id == user_id);
    rows.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
    rows
}

/// Active rentals already past their end date, soonest due first.
pub fn overdue(db: &Db, now: DateTime<Utc>) -> Vec<RentalRow> {
    by_end_date(db.rentals.filter(|r| r.status == RENTAL_ACTIVE && r.end_date < now))
}

/// Active rentals due within the next few days.
pub fn expiring(db: &Db, now: DateTime<Utc>) -> Vec<RentalRow> {
    let horizon = now + Duration::days(EXPIRING_WINDOW_DAYS);
    by_end_date(db.rentals.filter(|r| {
        r.status == RENTAL_ACTIVE && r.end_date >= now && r.end_date <= horizon
    }))
}

/// Records a reminder for every expiring rental that hasn't had one yet and
/// returns those rentals. Nothing is delivered.
pub fn record_reminders(db: &Db, now: DateTime<Utc>) -> Vec<RentalRow> {
    expiring(db, now)
        .into_iter()
        .filter(|rental| {
            db.rental_notifications
                .insert_unique(
                    |n| n.rental_id == rental.id && n.notification_type == NOTIFICATION_REMINDER,
                    |id| RentalNotificationRow {
                        id,
                        rental_id: rental.id,
                        notification_type: NOTIFICATION_REMINDER.to_string(),
                        sent_at: now,
                    },
                )
                .is_ok()
        })
        .collect()
}

fn by_end_date(mut rows: Vec<RentalRow>) -> Vec<RentalRow> {
    rows.sort_by(|a, b| a.end_date.cmp(&b.end_date).then(a.id.cmp(&b.id)));
    rows
}
