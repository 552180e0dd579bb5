pub mod errors;
pub mod github;
pub mod oauth;
pub mod render;
