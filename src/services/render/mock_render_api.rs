use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::models::{CreatedService, DeployReport, RenderService, StaticSiteSpec};
use super::service::RenderApi;
use crate::services::errors::ApiError;

/// Canned-response implementation for wiring tests. Deploy triggers always
/// succeed; the requested ids are recorded.
#[derive(Default)]
pub struct MockRenderApi {
    pub services: Vec<RenderService>,
    pub created: Option<CreatedService>,
    pub triggered: Mutex<Vec<String>>,
}

#[async_trait]
impl RenderApi for MockRenderApi {
    async fn list_services(&self, api_key: &str) -> Result<Vec<RenderService>, ApiError> {
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential("render api key"));
        }
        Ok(self.services.clone())
    }

    async fn trigger_deploys(
        &self,
        api_key: &str,
        service_ids: &BTreeSet<String>,
    ) -> Result<DeployReport, ApiError> {
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential("render api key"));
        }
        let mut report = DeployReport::default();
        let mut triggered = self.triggered.lock().expect("mock mutex");
        for id in service_ids {
            triggered.push(id.clone());
            report.results.insert(id.clone(), Ok(()));
        }
        Ok(report)
    }

    async fn create_static_site(
        &self,
        api_key: &str,
        spec: &StaticSiteSpec,
    ) -> Result<CreatedService, ApiError> {
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential("render api key"));
        }
        Ok(self.created.clone().unwrap_or_else(|| CreatedService {
            id: "srv-mock".to_string(),
            name: spec.name.clone(),
            raw: Default::default(),
        }))
    }
}
