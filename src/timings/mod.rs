pub mod gateway;
pub mod services;

pub use gateway::{AladhanGateway, TimingsGateway, Unavailable};
pub use services::{filter_available, PrayerTimes};
