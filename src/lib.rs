pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod review;
pub mod summary;
pub mod wiz;
