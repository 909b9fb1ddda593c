//! Job listing and job CRUD endpoints.

use tracing::info;

use anywork_client::{ApiClient, ApiResult};
use anywork_models::{CreateJobPayload, Job, JobFilters, JobId, Page, UpdateJobPayload};

#[derive(Clone)]
pub struct JobService {
    client: ApiClient,
}

impl JobService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch one page of jobs under the given filters.
    pub async fn list_jobs(&self, page: u32, filters: &JobFilters) -> ApiResult<Page<Job>> {
        self.client
            .get("/jobs/", &filters.to_query(page))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch jobs"))
    }

    /// Free-text search over jobs, unfiltered otherwise.
    pub async fn search_jobs(&self, query: &str, page: u32) -> ApiResult<Page<Job>> {
        let filters = JobFilters {
            search: Some(query.to_string()),
            ..JobFilters::default()
        };
        self.client
            .get("/jobs/", &filters.to_query(page))
            .await
            .map_err(|e| e.with_fallback("Failed to search jobs"))
    }

    pub async fn get_job(&self, id: &JobId) -> ApiResult<Job> {
        self.client
            .get(&format!("/jobs/{}/", id), &[])
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    e.with_fallback("Job not found")
                } else {
                    e.with_fallback("Failed to fetch job")
                }
            })
    }

    pub async fn create_job(&self, payload: &CreateJobPayload) -> ApiResult<Job> {
        let job: Job = self
            .client
            .post("/jobs/", payload)
            .await
            .map_err(|e| e.with_fallback("Failed to create job"))?;
        info!("Created job: {}", job.job_id);
        Ok(job)
    }

    /// Partial update; only fields present in the payload are sent.
    pub async fn update_job(&self, id: &JobId, payload: &UpdateJobPayload) -> ApiResult<Job> {
        self.client
            .patch(&format!("/jobs/{}/", id), payload)
            .await
            .map_err(|e| e.with_fallback("Failed to update job"))
    }

    pub async fn delete_job(&self, id: &JobId) -> ApiResult<()> {
        self.client
            .delete(&format!("/jobs/{}/", id))
            .await
            .map_err(|e| e.with_fallback("Failed to delete job"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anywork_client::{ApiConfig, MemoryStore};
    use anywork_models::JobType;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> JobService {
        let config = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(config, Arc::new(MemoryStore::new())).unwrap();
        JobService::new(client)
    }

    fn job_json(id: &str) -> serde_json::Value {
        json!({
            "job_id": id,
            "title": "Rust Engineer",
            "description": "Build services",
            "salary_range": "$120k-$150k",
            "job_type": "remote",
            "posted_at": "2024-01-01T00:00:00Z",
            "expires_at": "2024-02-01T00:00:00Z",
            "is_active": true,
            "employer": "u-2",
            "location": "l-1",
            "category": "c-1"
        })
    }

    fn page_json(results: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "count": results.len(),
            "next": null,
            "previous": null,
            "results": results
        })
    }

    #[tokio::test]
    async fn test_list_jobs_sends_page_and_filters() {
        let server = MockServer::start().await;
        let jobs = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .and(query_param("page", "3"))
            .and(query_param("job_type", "remote"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_json(vec![job_json("j-1")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let filters = JobFilters {
            job_type: Some(JobType::Remote),
            ..JobFilters::default()
        };
        let page = jobs.list_jobs(3, &filters).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].job_id.as_str(), "j-1");
    }

    #[tokio::test]
    async fn test_search_jobs_sends_search_param() {
        let server = MockServer::start().await;
        let jobs = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .and(query_param("page", "1"))
            .and(query_param("search", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let page = jobs.search_jobs("rust", 1).await.unwrap();
        assert_eq!(page.count, 0);
    }

    #[tokio::test]
    async fn test_get_job_missing_maps_to_not_found_message() {
        let server = MockServer::start().await;
        let jobs = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/jobs/j-404/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = jobs.get_job(&JobId::from("j-404")).await.unwrap_err();
        assert_eq!(err.to_string(), "Job not found");
    }

    #[tokio::test]
    async fn test_update_job_patches_only_present_fields() {
        let server = MockServer::start().await;
        let jobs = service(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/jobs/j-1/"))
            .and(wiremock::matchers::body_json(json!({"is_active": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(job_json("j-1")))
            .expect(1)
            .mount(&server)
            .await;

        let payload = UpdateJobPayload {
            is_active: Some(false),
            ..UpdateJobPayload::default()
        };
        let job = jobs.update_job(&JobId::from("j-1"), &payload).await.unwrap();
        assert_eq!(job.job_id.as_str(), "j-1");
    }

    #[tokio::test]
    async fn test_delete_job() {
        let server = MockServer::start().await;
        let jobs = service(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/jobs/j-1/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert!(jobs.delete_job(&JobId::from("j-1")).await.is_ok());
    }
}
