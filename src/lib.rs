pub mod catalog;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod models;
pub mod runner;
pub mod scenario;
