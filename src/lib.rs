pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod models;
pub mod pricing;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;
