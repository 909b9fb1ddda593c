//! Job seeker and employer profile models.

use serde::{Deserialize, Serialize};

use crate::user::{User, UserId};

/// Profile attached to a job seeker account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    pub user: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<User>,
}

/// Body for updating a job seeker profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateJobSeekerPayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Profile attached to an employer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub user: UserId,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<User>,
}

/// Body for updating an employer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEmployerPayload {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_optional_fields() {
        let json = r#"{
            "user": "3",
            "company_name": "Acme"
        }"#;

        let profile: EmployerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.company_name, "Acme");
        assert!(profile.website.is_none());
    }
}
