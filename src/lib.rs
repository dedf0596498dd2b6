pub mod ai;
pub mod analysis;
pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod lenient;
pub mod meals;
pub mod nutrition;
pub mod posts;
pub mod profile;
pub mod recipes;
pub mod state;
pub mod upload;
pub mod voice;
