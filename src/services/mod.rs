pub mod summary_api;
