/*
 * Responsibility
 * - 永続化層の公開口 (in-memory の Db と entity 毎の repo 関数)
 * - handler は Db を直接触らず *_repo の関数を通す
 */
pub mod book_repo;
pub mod comment_repo;
pub mod error;
pub mod post_repo;
pub mod rental_repo;
pub mod subscription_repo;
pub mod table;
pub mod travel_repo;
pub mod user_repo;

use book_repo::BookRow;
use comment_repo::CommentRow;
use post_repo::{PostRow, TagRow};
use rental_repo::{PurchaseRow, RentalNotificationRow, RentalRow};
use subscription_repo::SubscriptionRow;
use table::Table;
use travel_repo::{PlaceRow, TravelRow};
use user_repo::UserRow;

/// Every table of every app. A process only ever fills the ones its app uses.
#[derive(Debug, Default)]
pub struct Db {
    pub users: Table<UserRow>,

    pub posts: Table<PostRow>,
    pub tags: Table<TagRow>,
    pub comments: Table<CommentRow>,
    pub subscriptions: Table<SubscriptionRow>,

    pub books: Table<BookRow>,
    pub purchases: Table<PurchaseRow>,
    pub rentals: Table<RentalRow>,
    pub rental_notifications: Table<RentalNotificationRow>,

    pub travels: Table<TravelRow>,
    pub places: Table<PlaceRow>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }
}
