pub mod admin;
pub mod config;
pub mod content;
pub mod serve;
pub mod upload;
