//! Client-side validation.
//!
//! Checks that must reject bad input before any network call is made:
//! resume file type and size, password length.

use thiserror::Error;

use crate::resume::ResumeUpload;

/// Maximum accepted resume size (5 MiB).
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// The only accepted resume content type.
pub const RESUME_CONTENT_TYPE: &str = "application/pdf";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A client-side validation failure. The messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("File size must be less than 5MB")]
    FileTooLarge,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
}

/// Check a staged resume file before upload.
pub fn validate_resume_upload(upload: &ResumeUpload) -> Result<(), ValidationError> {
    if upload.content_type != RESUME_CONTENT_TYPE {
        return Err(ValidationError::NotPdf);
    }
    if upload.size() > MAX_RESUME_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}

/// Check a password before registration.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
