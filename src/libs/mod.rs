pub mod app;
pub mod attendance;
pub mod auth;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod messages;
pub mod product;
pub mod task;
pub mod user;
pub mod view;
