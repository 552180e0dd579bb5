use std::collections::BTreeSet;

use async_trait::async_trait;

use super::models::{CreatedService, DeployReport, RenderService, StaticSiteSpec};
use crate::services::errors::ApiError;

#[async_trait]
pub trait RenderApi: Send + Sync {
    async fn list_services(&self, api_key: &str) -> Result<Vec<RenderService>, ApiError>;

    /// Triggers a deploy for every id and reports the outcome per id.
    /// The outer `Result` fails only before any network work starts.
    async fn trigger_deploys(
        &self,
        api_key: &str,
        service_ids: &BTreeSet<String>,
    ) -> Result<DeployReport, ApiError>;

    async fn create_static_site(
        &self,
        api_key: &str,
        spec: &StaticSiteSpec,
    ) -> Result<CreatedService, ApiError>;
}
