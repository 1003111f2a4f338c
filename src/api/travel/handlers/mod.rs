pub mod travels;
pub mod users;
