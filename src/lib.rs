pub mod config;
pub mod export;
pub mod process;
pub mod schema;
pub mod view;
