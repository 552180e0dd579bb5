pub mod client;
pub mod errors;
pub mod models;
pub(crate) mod state_token;
