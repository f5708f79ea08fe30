pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod fetch;
pub mod output;
pub mod services;
pub mod stats;
