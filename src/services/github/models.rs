use serde::Deserialize;

/// Read-only projection of a GitHub repository. Only the full name
/// (`owner/name`) is carried; selections persist the full name alone.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
}
