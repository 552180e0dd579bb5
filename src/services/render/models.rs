use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::services::errors::ApiError;

/// Read-only projection of a Render service; selections persist the id.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RenderService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Everything Render needs to build a static site from a Git branch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSiteSpec {
    pub name: String,
    #[serde(rename = "repo")]
    pub repo_url: String,
    pub branch: String,
    pub build_command: String,
    pub publish_directory: String,
}

/// The service Render reports back after a creation. Fields beyond id and
/// name are kept verbatim so the stored record mirrors the raw response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedService {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

/// Per-service outcome of a deploy-trigger run. Every requested id has an
/// entry; a failed id does not stop the ids after it from being attempted.
#[derive(Debug, Default)]
pub struct DeployReport {
    pub results: BTreeMap<String, Result<(), ApiError>>,
}

impl DeployReport {
    pub fn all_succeeded(&self) -> bool {
        self.results.values().all(|result| result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ApiError)> {
        self.results.iter().filter_map(|(id, result)| match result {
            Ok(()) => None,
            Err(err) => Some((id.as_str(), err)),
        })
    }
}
