//! Field validation for the billing application's client, user and product
//! forms, including the Ecuadorian cédula checksum.

pub mod config;
pub mod error;
pub mod functional;
pub mod identification;
pub mod models;
pub mod services;
pub mod utils;

pub use identification::is_valid_national_id;
