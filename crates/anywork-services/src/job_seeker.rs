//! Job-seeker-side endpoints: profile, resumes, and skills.

use tracing::info;

use anywork_client::{ApiClient, ApiResult};
use anywork_models::{
    validate_resume_upload, JobSeekerProfile, Page, Resume, ResumeId, ResumeUpload, Skill, SkillId,
    UpdateJobSeekerPayload, UserId,
};

#[derive(Clone)]
pub struct JobSeekerService {
    client: ApiClient,
}

impl JobSeekerService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self, user_id: &UserId) -> ApiResult<JobSeekerProfile> {
        self.client
            .get(&format!("/jobseekers/{}/", user_id), &[])
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    e.with_fallback("Job seeker profile not found")
                } else {
                    e.with_fallback("Failed to fetch job seeker profile")
                }
            })
    }

    pub async fn update_profile(
        &self,
        user_id: &UserId,
        payload: &UpdateJobSeekerPayload,
    ) -> ApiResult<JobSeekerProfile> {
        self.client
            .put(&format!("/jobseekers/{}/", user_id), payload)
            .await
            .map_err(|e| e.with_fallback("Failed to update job seeker profile"))
    }

    pub async fn list_resumes(&self) -> ApiResult<Page<Resume>> {
        self.client
            .get("/resumes/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch resumes"))
    }

    /// Upload a resume file. Type and size are checked before any network
    /// traffic; a rejected file never leaves the client.
    pub async fn upload_resume(&self, upload: ResumeUpload) -> ApiResult<Resume> {
        validate_resume_upload(&upload)?;

        let resume: Resume = self
            .client
            .upload("/resumes/", upload)
            .await
            .map_err(|e| e.with_fallback("Failed to upload resume"))?;
        info!("Uploaded resume: {}", resume.resume_id);
        Ok(resume)
    }

    pub async fn delete_resume(&self, id: &ResumeId) -> ApiResult<()> {
        self.client
            .delete(&format!("/resumes/{}/", id))
            .await
            .map_err(|e| e.with_fallback("Failed to delete resume"))
    }

    pub async fn list_skills(&self) -> ApiResult<Page<Skill>> {
        self.client
            .get("/skills/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch skills"))
    }

    pub async fn add_skill(&self, name: &str) -> ApiResult<Skill> {
        self.client
            .post("/skills/", &serde_json::json!({ "name": name }))
            .await
            .map_err(|e| e.with_fallback("Failed to add skill"))
    }

    pub async fn delete_skill(&self, id: &SkillId) -> ApiResult<()> {
        self.client
            .delete(&format!("/skills/{}/", id))
            .await
            .map_err(|e| e.with_fallback("Failed to delete skill"))
    }
}
