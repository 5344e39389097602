pub mod config;
pub mod generate;
pub mod question;
pub mod transfer;
