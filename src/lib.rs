// src/lib.rs

pub mod attempt;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod shell;
pub mod state;
pub mod store;
pub mod utils;

pub use store::Repository;
