pub mod books;
pub mod rentals;
pub mod users;
