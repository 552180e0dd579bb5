pub mod client;
pub mod mock_github_api;
pub mod models;
pub mod service;
