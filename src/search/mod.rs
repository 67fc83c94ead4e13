pub mod fetcher;
pub mod models;
