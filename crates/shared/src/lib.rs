pub mod catalog;
pub mod models;
