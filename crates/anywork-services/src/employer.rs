//! Employer-side endpoints: owned jobs, profile, and taxonomy management.

use anywork_client::{ApiClient, ApiResult};
use anywork_models::{
    Category, CreateCategoryPayload, CreateLocationPayload, EmployerProfile, Job, Location, Page,
    UpdateEmployerPayload, UserId,
};

#[derive(Clone)]
pub struct EmployerService {
    client: ApiClient,
}

impl EmployerService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Jobs owned by the authenticated employer.
    pub async fn my_jobs(&self) -> ApiResult<Vec<Job>> {
        let page: Page<Job> = self
            .client
            .get("/employer/jobs/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch jobs"))?;
        Ok(page.results)
    }

    pub async fn profile(&self, user_id: &UserId) -> ApiResult<EmployerProfile> {
        self.client
            .get(&format!("/employers/{}/", user_id), &[])
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    e.with_fallback("Employer profile not found")
                } else {
                    e.with_fallback("Failed to fetch employer profile")
                }
            })
    }

    pub async fn update_profile(
        &self,
        user_id: &UserId,
        payload: &UpdateEmployerPayload,
    ) -> ApiResult<EmployerProfile> {
        self.client
            .put(&format!("/employers/{}/", user_id), payload)
            .await
            .map_err(|e| e.with_fallback("Failed to update employer profile"))
    }

    pub async fn list_categories(&self) -> ApiResult<Page<Category>> {
        self.client
            .get("/categories/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch categories"))
    }

    pub async fn create_category(&self, payload: &CreateCategoryPayload) -> ApiResult<Category> {
        self.client
            .post("/categories/", payload)
            .await
            .map_err(|e| e.with_fallback("Failed to create category"))
    }

    pub async fn list_locations(&self) -> ApiResult<Page<Location>> {
        self.client
            .get("/locations/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch locations"))
    }

    pub async fn create_location(&self, payload: &CreateLocationPayload) -> ApiResult<Location> {
        self.client
            .post("/locations/", payload)
            .await
            .map_err(|e| e.with_fallback("Failed to create location"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anywork_client::{ApiConfig, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> EmployerService {
        let config = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(config, Arc::new(MemoryStore::new())).unwrap();
        EmployerService::new(client)
    }

    #[tokio::test]
    async fn test_my_jobs_unwraps_results() {
        let server = MockServer::start().await;
        let employer = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/employer/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{
                    "job_id": "j-1",
                    "title": "Rust Engineer",
                    "description": "Build services",
                    "job_type": "full-time",
                    "posted_at": "2024-01-01T00:00:00Z",
                    "expires_at": "2024-02-01T00:00:00Z",
                    "is_active": true,
                    "employer": "u-2",
                    "location": "l-1",
                    "category": "c-1"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let jobs = employer.my_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id.as_str(), "j-1");
    }

    #[tokio::test]
    async fn test_profile_not_found_message() {
        let server = MockServer::start().await;
        let employer = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/employers/u-9/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = employer.profile(&UserId::from("u-9")).await.unwrap_err();
        assert_eq!(err.to_string(), "Employer profile not found");
    }

    #[tokio::test]
    async fn test_create_category() {
        let server = MockServer::start().await;
        let employer = service(&server).await;

        Mock::given(method("POST"))
            .and(path("/categories/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "category_id": "c-1",
                "name": "Engineering",
                "description": "Software roles"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = CreateCategoryPayload {
            name: "Engineering".to_string(),
            description: Some("Software roles".to_string()),
        };
        let category = employer.create_category(&payload).await.unwrap();
        assert_eq!(category.category_id, "c-1");
    }
}
