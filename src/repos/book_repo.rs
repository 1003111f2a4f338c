/*
 * Responsibility
 * - books テーブル向け操作 (shop)
 * - 在庫の引き当ては lock 内で検査と減算を同時に行う
 */
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::repos::Db;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_DISCONTINUED: &str = "discontinued";

#[derive(Debug, Clone, Serialize)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub publication_year: i64,
    pub price: f64,
    pub rental_price_2weeks: f64,
    pub rental_price_1month: f64,
    pub rental_price_3months: f64,
    pub stock_quantity: i64,
    pub available_for_rent: bool,
    pub available_for_purchase: bool,
    pub status: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSort {
    #[default]
    Title,
    TitleDesc,
    Author,
    AuthorDesc,
    Year,
    YearDesc,
    Category,
    CategoryDesc,
    Price,
    PriceDesc,
}

impl BookSort {
    /// Unknown values fall back to title order.
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or_default() {
            "title_desc" => Self::TitleDesc,
            "author" => Self::Author,
            "author_desc" => Self::AuthorDesc,
            "year" => Self::Year,
            "year_desc" => Self::YearDesc,
            "category" => Self::Category,
            "category_desc" => Self::CategoryDesc,
            "price" => Self::Price,
            "price_desc" => Self::PriceDesc,
            _ => Self::Title,
        }
    }

    fn compare(&self, a: &BookRow, b: &BookRow) -> Ordering {
        let primary = match self {
            Self::Title => a.title.cmp(&b.title),
            Self::TitleDesc => b.title.cmp(&a.title),
            Self::Author => a.author.cmp(&b.author),
            Self::AuthorDesc => b.author.cmp(&a.author),
            Self::Year => a.publication_year.cmp(&b.publication_year),
            Self::YearDesc => b.publication_year.cmp(&a.publication_year),
            Self::Category => a.category.cmp(&b.category),
            Self::CategoryDesc => b.category.cmp(&a.category),
            Self::Price => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[derive(Debug, Default)]
pub struct BookQuery<'a> {
    pub category: Option<&'a str>,
    pub author: Option<&'a str>,
    pub sort: BookSort,
}

#[derive(Debug)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub publication_year: i64,
    pub price: f64,
    pub rental_price_2weeks: f64,
    pub rental_price_1month: f64,
    pub rental_price_3months: f64,
    pub stock_quantity: i64,
    pub available_for_rent: bool,
    pub available_for_purchase: bool,
    pub status: String,
    pub category: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publication_year: Option<i64>,
    pub price: Option<f64>,
    pub rental_price_2weeks: Option<f64>,
    pub rental_price_1month: Option<f64>,
    pub rental_price_3months: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub available_for_rent: Option<bool>,
    pub available_for_purchase: Option<bool>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
}

/// What a customer wants to do with a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Purchase,
    Rent,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("book not found")]
    NotFound,
    #[error("book is not offered for this")]
    NotOffered,
    #[error("out of stock")]
    OutOfStock,
    #[error("not enough copies in stock")]
    Insufficient,
}

/// Catalogue listing; discontinued books are never shown.
pub fn list(db: &Db, query: &BookQuery<'_>) -> Vec<BookRow> {
    let mut books = db.books.filter(|b| {
        b.status != STATUS_DISCONTINUED
            && query.category.is_none_or(|c| b.category.as_deref() == Some(c))
            && query.author.is_none_or(|a| b.author.as_deref() == Some(a))
    });
    books.sort_by(|a, b| query.sort.compare(a, b));
    books
}

/// Active books with stock that can currently be bought (or rented).
pub fn list_available(db: &Db, offer: Offer) -> Vec<BookRow> {
    let mut books = db.books.filter(|b| {
        b.status == STATUS_ACTIVE && b.stock_quantity > 0 && is_offered(b, offer)
    });
    books.sort_by(|a, b| BookSort::Title.compare(a, b));
    books
}

pub fn get(db: &Db, id: i64) -> Option<BookRow> {
    db.books.get(id)
}

pub fn create(db: &Db, new: NewBook) -> BookRow {
    let now = Utc::now();
    db.books.insert_with(|id| BookRow {
        id,
        title: new.title,
        description: new.description,
        publication_year: new.publication_year,
        price: new.price,
        rental_price_2weeks: new.rental_price_2weeks,
        rental_price_1month: new.rental_price_1month,
        rental_price_3months: new.rental_price_3months,
        stock_quantity: new.stock_quantity,
        available_for_rent: new.available_for_rent,
        available_for_purchase: new.available_for_purchase,
        status: new.status,
        category: new.category,
        author: new.author,
        created_at: now,
        updated_at: now,
    })
}

pub fn update(db: &Db, id: i64, changes: BookChanges) -> Option<BookRow> {
    db.books.update(id, |book| {
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = changes.$field {
                    book.$field = value;
                })*
            };
        }
        apply!(
            title,
            publication_year,
            price,
            rental_price_2weeks,
            rental_price_1month,
            rental_price_3months,
            stock_quantity,
            available_for_rent,
            available_for_purchase,
            status,
        );
        if let Some(description) = changes.description {
            book.description = Some(description);
        }
        if let Some(category) = changes.category {
            book.category = Some(category);
        }
        if let Some(author) = changes.author {
            book.author = Some(author);
        }
        book.updated_at = Utc::now();
        book.clone()
    })
}

/// Deletes the book with its purchases, rentals and their reminders.
pub fn delete(db: &Db, id: i64) -> bool {
    if db.books.delete(id).is_none() {
        return false;
    }

    let rental_ids: Vec<i64> = db
        .rentals
        .filter(|r| r.book_id == id)
        .into_iter()
        .map(|r| r.id)
        .collect();
    db.purchases.delete_where(|p| p.book_id == id);
    db.rentals.delete_where(|r| r.book_id == id);
    db.rental_notifications
        .delete_where(|n| rental_ids.contains(&n.rental_id));
    true
}

/// Checks availability and removes `quantity` copies in one step.
/// Returns the book as it was before the stock change.
pub fn take_stock(db: &Db, id: i64, offer: Offer, quantity: i64) -> Result<BookRow, StockError> {
    db.books
        .update(id, |book| {
            check_stock(book, offer, quantity)?;

            let before = book.clone();
            book.stock_quantity -= quantity;
            book.updated_at = Utc::now();
            Ok(before)
        })
        .unwrap_or(Err(StockError::NotFound))
}

/// Whether `quantity` copies of `book` can go out for `offer` right now.
pub fn check_stock(book: &BookRow, offer: Offer, quantity: i64) -> Result<(), StockError> {
    if !is_offered(book, offer) {
        return Err(StockError::NotOffered);
    }
    if book.stock_quantity <= 0 {
        return Err(StockError::OutOfStock);
    }
    if quantity > book.stock_quantity {
        return Err(StockError::Insufficient);
    }
    Ok(())
}

/// Distinct non-empty values of a book field with the number of books carrying each, by name.
pub fn distinct_counts<F>(db: &Db, field: F) -> Vec<(String, usize)>
where
    F: Fn(&BookRow) -> Option<&str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for book in db.books.all() {
        let Some(value) = field(&book).filter(|v| !v.is_empty()) else {
            continue;
        };
        match counts.iter_mut().find(|(name, _)| name == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts.sort_by(|(a, _), (b, _)| a.cmp(b));
    counts
}

fn is_offered(book: &BookRow, offer: Offer) -> bool {
    match offer {
        Offer::Purchase => book.available_for_purchase,
        Offer::Rent => book.available_for_rent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(db: &Db, title: &str, stock: i64, category: Option<&str>) -> BookRow {
        create(
            db,
            NewBook {
                title: title.into(),
                description: None,
                publication_year: 2000,
                price: 10.0,
                rental_price_2weeks: 1.0,
                rental_price_1month: 2.0,
                rental_price_3months: 5.0,
                stock_quantity: stock,
                available_for_rent: true,
                available_for_purchase: true,
                status: STATUS_ACTIVE.into(),
                category: category.map(Into::into),
                author: None,
            },
        )
    }

    #[test]
    fn take_stock_checks_then_decrements() {
        let db = Db::new();
        let b = book(&db, "t", 2, None);

        assert_eq!(
            take_stock(&db, b.id, Offer::Purchase, 3).unwrap_err(),
            StockError::Insufficient
        );
        let before = take_stock(&db, b.id, Offer::Purchase, 2).unwrap();
        assert_eq!(before.stock_quantity, 2);
        assert_eq!(get(&db, b.id).unwrap().stock_quantity, 0);
        assert_eq!(take_stock(&db, b.id, Offer::Rent, 1).unwrap_err(), StockError::OutOfStock);
        assert_eq!(take_stock(&db, 99, Offer::Rent, 1).unwrap_err(), StockError::NotFound);
    }

    #[test]
    fn unavailable_books_are_refused() {
        let db = Db::new();
        let b = book(&db, "t", 5, None);
        update(
            &db,
            b.id,
            BookChanges {
                available_for_rent: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(take_stock(&db, b.id, Offer::Rent, 1).unwrap_err(), StockError::NotOffered);
        assert!(list_available(&db, Offer::Rent).is_empty());
        assert_eq!(list_available(&db, Offer::Purchase).len(), 1);
    }

    #[test]
    fn catalogue_hides_discontinued_and_filters() {
        let db = Db::new();
        book(&db, "b", 1, Some("sci-fi"));
        book(&db, "a", 1, Some("poetry"));
        let gone = book(&db, "c", 1, Some("sci-fi"));
        update(
            &db,
            gone.id,
            BookChanges {
                status: Some(STATUS_DISCONTINUED.into()),
                ..Default::default()
            },
        );

        let titles: Vec<String> = list(&db, &BookQuery::default())
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["a", "b"]);

        let query = BookQuery {
            category: Some("sci-fi"),
            ..Default::default()
        };
        assert_eq!(list(&db, &query).len(), 1);

        assert_eq!(
            distinct_counts(&db, |b| b.category.as_deref()),
            [("poetry".to_string(), 1), ("sci-fi".to_string(), 2)]
        );
    }
}
