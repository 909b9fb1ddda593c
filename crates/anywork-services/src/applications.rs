//! Application endpoints, shared by job seekers and employers.

use anywork_client::{ApiClient, ApiResult};
use anywork_models::{
    Application, ApplicationFilters, ApplicationId, ApplicationStatus, CreateApplicationPayload,
    JobId, Page, UpdateApplicationPayload,
};

#[derive(Clone)]
pub struct ApplicationService {
    client: ApiClient,
}

impl ApplicationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_applications(
        &self,
        page: u32,
        filters: &ApplicationFilters,
    ) -> ApiResult<Page<Application>> {
        self.client
            .get("/applications/", &filters.to_query(page))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch applications"))
    }

    pub async fn get_application(&self, id: &ApplicationId) -> ApiResult<Application> {
        self.client
            .get(&format!("/applications/{}/", id), &[])
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    e.with_fallback("Application not found")
                } else {
                    e.with_fallback("Failed to fetch application")
                }
            })
    }

    pub async fn create_application(
        &self,
        payload: &CreateApplicationPayload,
    ) -> ApiResult<Application> {
        self.client
            .post("/applications/", payload)
            .await
            .map_err(|e| e.with_fallback("Failed to create application"))
    }

    /// Partial update of cover letter or status.
    pub async fn update_application(
        &self,
        id: &ApplicationId,
        payload: &UpdateApplicationPayload,
    ) -> ApiResult<Application> {
        self.client
            .patch(&format!("/applications/{}/", id), payload)
            .await
            .map_err(|e| e.with_fallback("Failed to update application"))
    }

    /// Request a status transition. The server stays authoritative; the
    /// returned record carries whatever status it settled on.
    pub async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> ApiResult<Application> {
        self.client
            .patch(
                &format!("/applications/{}/", id),
                &serde_json::json!({ "status": status }),
            )
            .await
            .map_err(|e| e.with_fallback("Failed to update application status"))
    }

    pub async fn delete_application(&self, id: &ApplicationId) -> ApiResult<()> {
        self.client
            .delete(&format!("/applications/{}/", id))
            .await
            .map_err(|e| e.with_fallback("Failed to delete application"))
    }

    /// All applications submitted against one job.
    pub async fn applications_for_job(
        &self,
        job: &JobId,
        page: u32,
    ) -> ApiResult<Page<Application>> {
        let filters = ApplicationFilters {
            job: Some(job.clone()),
            ..ApplicationFilters::default()
        };
        self.client
            .get("/applications/", &filters.to_query(page))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch job applications"))
    }
}
