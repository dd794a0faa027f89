pub mod command;
pub mod config;
pub mod connection;
pub mod reply;
pub mod runner;
pub mod script;
pub mod tours;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
