pub mod api;
pub mod config;
pub mod gamedb;
pub mod models;
