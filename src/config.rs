use std::env;

pub struct Config {
    /// Redirect URL registered on the GitHub OAuth app; GitHub sends the
    /// callback (code + state) back here.
    pub github_redirect_uri: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let github_redirect_uri =
            env::var("GITHUB_REDIRECT_URI").expect("GITHUB_REDIRECT_URI must be set");

        Config {
            github_redirect_uri,
        }
    }

    pub fn new(github_redirect_uri: impl Into<String>) -> Self {
        Config {
            github_redirect_uri: github_redirect_uri.into(),
        }
    }
}
