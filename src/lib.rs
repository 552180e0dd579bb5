pub mod config;
pub mod services;
pub mod state;
pub mod store;

pub use state::AppState;
