//! Typed resource services for the AnyWork API.
//!
//! One service per domain resource, each a stateless façade over the
//! gateway client:
//! - Auth (register, login, Google OAuth)
//! - Jobs, Applications, Notifications
//! - Employer and job-seeker profiles, resumes, skills
//! - Job analytics
//!
//! Services re-wrap gateway errors with a domain message while keeping any
//! server-provided message verbatim.

pub mod analytics;
pub mod applications;
pub mod auth;
pub mod employer;
pub mod job_seeker;
pub mod jobs;
pub mod notifications;

pub use analytics::AnalyticsService;
pub use applications::ApplicationService;
pub use auth::AuthService;
pub use employer::EmployerService;
pub use job_seeker::JobSeekerService;
pub use jobs::JobService;
pub use notifications::NotificationService;
