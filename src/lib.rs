pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod logging;
pub mod parallel;
pub mod render;
pub mod roll;
pub mod search;
pub mod server;

pub use error::SeedError;
