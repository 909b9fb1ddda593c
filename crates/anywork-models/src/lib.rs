//! Shared data models for the AnyWork job marketplace API.
//!
//! This crate provides Serde-serializable types for:
//! - Users, job seeker and employer profiles
//! - Jobs, applications and resumes
//! - Notifications, skills and job analytics
//! - Response envelopes (paginated lists, auth payloads)
//! - Search filters and client-side validation

pub mod analytics;
pub mod application;
pub mod envelope;
pub mod filters;
pub mod job;
pub mod notification;
pub mod profile;
pub mod resume;
pub mod skill;
pub mod taxonomy;
pub mod user;
pub mod validate;

// Re-export common types
pub use analytics::JobAnalytics;
pub use application::{
    ApplicantSummary, Application, ApplicationId, ApplicationStatus, CreateApplicationPayload,
    ResumeSummary, UpdateApplicationPayload,
};
pub use envelope::{ApiEnvelope, AuthData, LoginPayload, Page, RegisterPayload};
pub use filters::{ApplicationFilters, JobFilters};
pub use job::{CreateJobPayload, EmployerSummary, Job, JobId, JobType, UpdateJobPayload};
pub use notification::{CreateNotificationPayload, Notification, NotificationId};
pub use profile::{
    EmployerProfile, JobSeekerProfile, UpdateEmployerPayload, UpdateJobSeekerPayload,
};
pub use resume::{Resume, ResumeId, ResumeUpload};
pub use skill::{Skill, SkillId};
pub use taxonomy::{Category, CreateCategoryPayload, CreateLocationPayload, Location};
pub use user::{Role, User, UserId};
pub use validate::{validate_password, validate_resume_upload, ValidationError};
