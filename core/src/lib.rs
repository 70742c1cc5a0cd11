//! fraudgen-core: deterministic generator of labeled synthetic
//! accounts-and-invoices datasets for fraud-detection training.

pub mod account;
pub mod calendar;
pub mod config;
pub mod context;
pub mod document;
pub mod duplicate;
pub mod error;
pub mod export;
pub mod generator;
pub mod identifier;
pub mod label;
pub mod name_generator;
pub mod pipeline;
pub mod rng;
pub mod round_amount;
pub mod store;
pub mod temporal;
pub mod trace;
pub mod types;
