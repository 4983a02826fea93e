//! Daily prayer tracker: accounts, per-day prayer records, and prayer
//! timings fetched per region.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod i18n;
pub mod prayers;
pub mod state;
pub mod timings;
pub mod views;
