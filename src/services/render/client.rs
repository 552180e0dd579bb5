use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::models::{CreatedService, DeployReport, RenderService, StaticSiteSpec};
use super::service::RenderApi;
use crate::services::errors::{status_error, ApiError};

pub const RENDER_API_BASE_URL: &str = "https://api.render.com/v1";

#[derive(Clone)]
pub struct RenderClient {
    client: Client,
    #[cfg(test)]
    base_url_override: Option<String>,
}

impl RenderClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            #[cfg(test)]
            base_url_override: None,
        }
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or(RENDER_API_BASE_URL)
    }

    #[cfg(not(test))]
    fn base_url(&self) -> &str {
        RENDER_API_BASE_URL
    }

    #[cfg(test)]
    pub(crate) fn set_base_url_override(&mut self, base_url: impl Into<String>) {
        self.base_url_override = Some(base_url.into());
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn trigger_one(&self, api_key: &str, service_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("services/{service_id}/deploys")))
            .bearer_auth(api_key)
            .json(&json!({}))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Render answers a successful trigger with 201 and nothing else.
        if status == reqwest::StatusCode::CREATED {
            Ok(())
        } else {
            Err(status_error(status, &body))
        }
    }
}

fn require_api_key(api_key: &str) -> Result<(), ApiError> {
    if api_key.trim().is_empty() {
        Err(ApiError::MissingCredential("render api key"))
    } else {
        Ok(())
    }
}

#[async_trait]
impl RenderApi for RenderClient {
    async fn list_services(&self, api_key: &str) -> Result<Vec<RenderService>, ApiError> {
        require_api_key(api_key)?;

        let response = self
            .client
            .get(self.endpoint("services"))
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("render service listing failed with status {status}");
            return Err(status_error(status, &body));
        }

        serde_json::from_str::<Vec<RenderService>>(&body)
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))
    }

    async fn trigger_deploys(
        &self,
        api_key: &str,
        service_ids: &BTreeSet<String>,
    ) -> Result<DeployReport, ApiError> {
        require_api_key(api_key)?;

        let mut report = DeployReport::default();
        for service_id in service_ids {
            let outcome = self.trigger_one(api_key, service_id).await;
            match &outcome {
                Ok(()) => info!("deploy triggered for {service_id}"),
                Err(err) => warn!("deploy trigger failed for {service_id}: {err}"),
            }
            report.results.insert(service_id.clone(), outcome);
        }
        Ok(report)
    }

    async fn create_static_site(
        &self,
        api_key: &str,
        spec: &StaticSiteSpec,
    ) -> Result<CreatedService, ApiError> {
        require_api_key(api_key)?;

        #[derive(Serialize)]
        struct CreateServiceBody<'a> {
            #[serde(rename = "type")]
            service_type: &'static str,
            #[serde(flatten)]
            spec: &'a StaticSiteSpec,
        }

        let response = self
            .client
            .post(self.endpoint("services"))
            .bearer_auth(api_key)
            .json(&CreateServiceBody {
                service_type: "static_site",
                spec,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Strictly 201; anything else is a failure even with a plausible body.
        if status != reqwest::StatusCode::CREATED {
            warn!("static site creation failed with status {status}");
            return Err(status_error(status, &body));
        }

        let created = serde_json::from_str::<CreatedService>(&body)
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))?;
        info!("static site {} created as {}", created.name, created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    const API_KEY: &str = "rnd_testkey";

    fn client_for(server: &MockServer) -> RenderClient {
        let mut client = RenderClient::new(Client::new());
        client.set_base_url_override(server.base_url());
        client
    }

    fn site_spec() -> StaticSiteSpec {
        StaticSiteSpec {
            name: "docs".into(),
            repo_url: "https://github.com/octocat/docs".into(),
            branch: "main".into(),
            build_command: "npm run build".into(),
            publish_directory: "dist".into(),
        }
    }

    #[tokio::test]
    async fn lists_services() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/services")
                .header("authorization", format!("Bearer {API_KEY}"));
            then.status(200).json_body(json!([
                { "id": "srv-1", "name": "docs", "url": "https://docs.onrender.com" },
                { "id": "srv-2", "name": "blog" }
            ]));
        });

        let services = client_for(&server).list_services(API_KEY).await.unwrap();

        mock.assert();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].id, "srv-1");
        assert_eq!(services[0].url.as_deref(), Some("https://docs.onrender.com"));
        assert_eq!(services[1].name, "blog");
        assert_eq!(services[1].url, None);
    }

    #[tokio::test]
    async fn non_list_services_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/services");
            then.status(200)
                .json_body(json!({ "message": "unexpected shape" }));
        });

        let err = client_for(&server)
            .list_services(API_KEY)
            .await
            .expect_err("object body");
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_api_key_short_circuits_every_operation() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.path_contains("/services");
            then.status(201).json_body(json!({}));
        });
        let client = client_for(&server);

        assert!(matches!(
            client.list_services(" ").await,
            Err(ApiError::MissingCredential(_))
        ));

        let ids: BTreeSet<String> = ["srv-1".to_string()].into_iter().collect();
        assert!(matches!(
            client.trigger_deploys("", &ids).await,
            Err(ApiError::MissingCredential(_))
        ));

        assert!(matches!(
            client.create_static_site("", &site_spec()).await,
            Err(ApiError::MissingCredential(_))
        ));

        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn trigger_attempts_every_id_and_attributes_the_failure() {
        let server = MockServer::start();
        let ok_a = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/services/srv-a/deploys");
            then.status(201).json_body(json!({ "id": "dep-a" }));
        });
        let fail_b = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/services/srv-b/deploys");
            then.status(500)
                .json_body(json!({ "message": "internal error" }));
        });
        let ok_c = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/services/srv-c/deploys");
            then.status(201).json_body(json!({ "id": "dep-c" }));
        });

        let ids: BTreeSet<String> = ["srv-a", "srv-b", "srv-c"]
            .into_iter()
            .map(String::from)
            .collect();
        let report = client_for(&server)
            .trigger_deploys(API_KEY, &ids)
            .await
            .unwrap();

        ok_a.assert();
        fail_b.assert();
        ok_c.assert();

        assert!(!report.all_succeeded());
        assert_eq!(report.results.len(), 3);
        assert!(report.results["srv-a"].is_ok());
        assert!(report.results["srv-c"].is_ok());

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        let (failed_id, err) = failures[0];
        assert_eq!(failed_id, "srv-b");
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn deploy_success_is_strictly_201() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/services/srv-a/deploys");
            then.status(200).json_body(json!({ "id": "dep-a" }));
        });

        let ids: BTreeSet<String> = ["srv-a".to_string()].into_iter().collect();
        let report = client_for(&server)
            .trigger_deploys(API_KEY, &ids)
            .await
            .unwrap();

        assert!(!report.all_succeeded());
        assert!(report.results["srv-a"].is_err());
    }

    #[tokio::test]
    async fn creates_a_static_site() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/services")
                .header("authorization", format!("Bearer {API_KEY}"))
                .json_body_partial(
                    json!({
                        "type": "static_site",
                        "name": "docs",
                        "repo": "https://github.com/octocat/docs",
                        "branch": "main",
                        "buildCommand": "npm run build",
                        "publishDirectory": "dist"
                    })
                    .to_string(),
                );
            then.status(201).json_body(json!({
                "id": "srv-new",
                "name": "docs",
                "type": "static_site",
                "autoDeploy": "yes"
            }));
        });

        let created = client_for(&server)
            .create_static_site(API_KEY, &site_spec())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(created.id, "srv-new");
        assert_eq!(created.name, "docs");
        assert_eq!(created.raw["autoDeploy"], json!("yes"));
    }

    #[tokio::test]
    async fn create_rejects_a_200_even_with_a_plausible_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/services");
            then.status(200)
                .json_body(json!({ "id": "srv-new", "name": "docs" }));
        });

        let err = client_for(&server)
            .create_static_site(API_KEY, &site_spec())
            .await
            .expect_err("200 is not success");
        assert!(matches!(err, ApiError::Api { .. }));
    }

    #[tokio::test]
    async fn create_surfaces_the_upstream_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/services");
            then.status(400)
                .json_body(json!({ "message": "a service with this name already exists" }));
        });

        let err = client_for(&server)
            .create_static_site(API_KEY, &site_spec())
            .await
            .expect_err("400");

        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(message, "a service with this name already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
