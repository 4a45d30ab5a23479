pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod search;
pub mod state;
pub mod store;
