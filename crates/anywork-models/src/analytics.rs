//! Job analytics models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// Daily view and application counts for a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalytics {
    pub analytics_id: String,
    pub views: u64,
    pub applications: u64,
    pub date: NaiveDate,
    pub job: JobId,
}
