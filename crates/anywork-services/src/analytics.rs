//! Job analytics endpoints.

use anywork_client::{ApiClient, ApiResult};
use anywork_models::{JobAnalytics, JobId, Page};

#[derive(Clone)]
pub struct AnalyticsService {
    client: ApiClient,
}

impl AnalyticsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_analytics(&self) -> ApiResult<Page<JobAnalytics>> {
        self.client
            .get("/analytics/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch analytics"))
    }

    pub async fn get_analytics(&self, id: &str) -> ApiResult<JobAnalytics> {
        self.client
            .get(&format!("/analytics/{}/", id), &[])
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    e.with_fallback("Analytics not found")
                } else {
                    e.with_fallback("Failed to fetch analytics")
                }
            })
    }

    /// Daily analytics rows for one job.
    pub async fn job_analytics(&self, job: &JobId) -> ApiResult<Page<JobAnalytics>> {
        let query = vec![("job".to_string(), job.to_string())];
        self.client
            .get("/analytics/", &query)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch job analytics"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anywork_client::{ApiConfig, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> AnalyticsService {
        let config = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(config, Arc::new(MemoryStore::new())).unwrap();
        AnalyticsService::new(client)
    }

    #[tokio::test]
    async fn test_job_analytics_filters_by_job() {
        let server = MockServer::start().await;
        let analytics = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/analytics/"))
            .and(query_param("job", "j-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{
                    "analytics_id": "an-1",
                    "views": 42,
                    "applications": 3,
                    "date": "2024-01-01",
                    "job": "j-1"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = analytics.job_analytics(&JobId::from("j-1")).await.unwrap();
        assert_eq!(page.results[0].views, 42);
    }
}
