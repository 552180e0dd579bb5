pub mod client;
pub mod mock_render_api;
pub mod models;
pub mod service;
