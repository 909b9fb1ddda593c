//! Search filters for list endpoints.

use serde::{Deserialize, Serialize};

use crate::application::ApplicationStatus;
use crate::job::{JobId, JobType};
use crate::user::UserId;

/// Filters accepted by the job list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilters {
    pub search: Option<String>,
    pub job_type: Option<JobType>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

impl JobFilters {
    /// Render the filters plus a page number as query pairs. Absent and
    /// empty values are skipped.
    pub fn to_query(&self, page: u32) -> Vec<(String, String)> {
        let mut pairs = vec![("page".to_string(), page.to_string())];
        push_if_present(&mut pairs, "search", self.search.as_deref());
        if let Some(job_type) = self.job_type {
            pairs.push(("job_type".to_string(), job_type.as_str().to_string()));
        }
        push_if_present(&mut pairs, "salary_min", self.salary_min.as_deref());
        push_if_present(&mut pairs, "salary_max", self.salary_max.as_deref());
        push_if_present(&mut pairs, "location", self.location.as_deref());
        push_if_present(&mut pairs, "category", self.category.as_deref());
        pairs
    }
}

/// Filters accepted by the application list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFilters {
    pub status: Option<ApplicationStatus>,
    pub job: Option<JobId>,
    pub job_seeker: Option<UserId>,
}

impl ApplicationFilters {
    /// Render the filters plus a page number as query pairs.
    pub fn to_query(&self, page: u32) -> Vec<(String, String)> {
        let mut pairs = vec![("page".to_string(), page.to_string())];
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        push_if_present(&mut pairs, "job", self.job.as_ref().map(JobId::as_str));
        push_if_present(
            &mut pairs,
            "job_seeker",
            self.job_seeker.as_ref().map(UserId::as_str),
        );
        pairs
    }
}

fn push_if_present(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.is_empty() {
            pairs.push((key.to_string(), v.to_string()));
        }
    }
}
