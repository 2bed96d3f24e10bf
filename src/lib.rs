pub mod admin;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;
