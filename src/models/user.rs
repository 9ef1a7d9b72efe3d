use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Business,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub marketing_emails: bool,
    pub public_profile: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            marketing_emails: false,
            public_profile: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Set for business accounts only.
    pub company_name: Option<String>,
    pub credential: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub settings: NotificationSettings,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_business(&self) -> bool {
        self.role == Role::Business
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }
}

/// Registration payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub credential: String,
}

impl NewUser {
    pub fn customer(name: &str, email: &str, credential: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Customer,
            company_name: None,
            credential: credential.to_string(),
        }
    }

    pub fn business(name: &str, email: &str, company: &str, credential: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Business,
            company_name: Some(company.to_string()),
            credential: credential.to_string(),
        }
    }

    pub fn admin(name: &str, email: &str, credential: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Admin,
            company_name: None,
            credential: credential.to_string(),
        }
    }
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub settings: Option<NotificationSettings>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.settings.is_none()
    }
}
