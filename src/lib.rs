/*
 * Responsibility
 * - crate の module 構成 (binary と integration test の共通の入口)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod policy;
pub mod repos;
pub mod routing;
pub mod services;
pub mod state;
