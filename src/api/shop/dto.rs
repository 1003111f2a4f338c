/*
 * Responsibility
 * - shop の request/response DTO
 * - 購入・貸出の行に book / user の表示用項目を付けた形
 */
use serde::{Deserialize, Serialize};

use crate::api::common::dto::present;
use crate::repos::book_repo::{BookChanges, NewBook, STATUS_ACTIVE};
use crate::repos::rental_repo::{PurchaseRow, RentalRow};

/// Book create / update body. Create needs title, publication_year and price.
#[derive(Debug, Default, Deserialize)]
pub struct BookRequest {
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

impl BookRequest {
    pub fn into_new_book(self) -> Result<NewBook, &'static str> {
        let title = present(&self.title).map(str::to_string);
        let (Some(title), Some(publication_year), Some(price)) =
            (title, self.publication_year, self.price)
        else {
            return Err("Обязательные поля: title, publication_year, price");
        };

        Ok(NewBook {
            title,
            description: self.description,
            publication_year,
            price,
            rental_price_2weeks: self.rental_price_2weeks.unwrap_or(0.0),
            rental_price_1month: self.rental_price_1month.unwrap_or(0.0),
            rental_price_3months: self.rental_price_3months.unwrap_or(0.0),
            stock_quantity: self.stock_quantity.unwrap_or(0),
            available_for_rent: self.available_for_rent.unwrap_or(true),
            available_for_purchase: self.available_for_purchase.unwrap_or(true),
            status: self.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            category: self.category,
            author: self.author,
        })
    }
}

impl From<BookRequest> for BookChanges {
    fn from(r: BookRequest) -> Self {
        Self {
            title: r.title.filter(|t| !t.trim().is_empty()),
            description: r.description,
            publication_year: r.publication_year,
            price: r.price,
            rental_price_2weeks: r.rental_price_2weeks,
            rental_price_1month: r.rental_price_1month,
            rental_price_3months: r.rental_price_3months,
            stock_quantity: r.stock_quantity,
            available_for_rent: r.available_for_rent,
            available_for_purchase: r.available_for_purchase,
            status: r.status,
            category: r.category,
            author: r.author,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseRequest {
    pub quantity: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RentRequest {
    pub rental_period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseView {
    #[serde(flatten)]
    pub purchase: PurchaseRow,
    pub book_title: Option<String>,
    pub book_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RentalView {
    #[serde(flatten)]
    pub rental: RentalRow,
    pub book_title: Option<String>,
}

/// Rental as admins see it, with who has the book.
#[derive(Debug, Serialize)]
pub struct AdminRentalView {
    #[serde(flatten)]
    pub rental: RentalRow,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub book_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub book_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_gets_catalogue_defaults() {
        let req: BookRequest =
            serde_json::from_str(r#"{"title":"Dune","publication_year":1965,"price":9.5}"#).unwrap();
        let book = req.into_new_book().unwrap();

        assert_eq!(book.stock_quantity, 0);
        assert_eq!(book.rental_price_1month, 0.0);
        assert!(book.available_for_rent && book.available_for_purchase);
        assert_eq!(book.status, STATUS_ACTIVE);
    }

    #[test]
    fn new_book_without_price_is_refused() {
        let req: BookRequest = serde_json::from_str(r#"{"title":"Dune","publication_year":1965}"#).unwrap();
        assert_eq!(
            req.into_new_book().unwrap_err(),
            "Обязательные поля: title, publication_year, price"
        );
    }
}
