use super::{ComplaintStore, EntityKind, Outcome, StoreError, StoreEvent, StoreResult};
use crate::models::{NewUser, NotificationSettings, ProfileUpdate, Role, User, UserId};
use chrono::Utc;
use uuid::Uuid;

impl ComplaintStore {
    /// Creates an account. Emails are unique regardless of case.
    pub fn register_user(&mut self, request: NewUser) -> StoreResult<User> {
        let email = request.email.trim().to_string();
        if request.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("Name must not be empty".into()));
        }
        if !email.contains('@') {
            return Err(StoreError::InvalidInput(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if self.user_by_email(&email).is_some() {
            return Err(StoreError::Duplicate(format!(
                "An account for {email} already exists"
            )));
        }
        let company_name = request
            .company_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        match (request.role, &company_name) {
            (Role::Business, None) => {
                return Err(StoreError::InvalidInput(
                    "Business accounts need a company name".into(),
                ))
            }
            (Role::Customer | Role::Admin, Some(_)) => {
                return Err(StoreError::InvalidInput(
                    "Only business accounts carry a company name".into(),
                ))
            }
            _ => {}
        }

        let user = User {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email,
            role: request.role,
            company_name,
            credential: request.credential,
            bio: String::new(),
            settings: NotificationSettings::default(),
            created_at: Utc::now(),
        };
        self.state.users.push(user.clone());
        if let Err(err) = self.persist() {
            self.state.users.pop();
            return Err(err);
        }
        self.notify(&StoreEvent::UserRegistered { user_id: user.id });
        Ok(user)
    }

    /// Plain equality check of email and credential.
    pub fn authenticate(&self, email: &str, credential: &str) -> StoreResult<&User> {
        self.user_by_email(email)
            .filter(|user| user.credential == credential)
            .ok_or_else(|| StoreError::Forbidden("Invalid email or credential".into()))
    }

    pub fn update_profile(&mut self, user_id: &UserId, update: ProfileUpdate) -> StoreResult<Outcome> {
        let index = self
            .state
            .users
            .iter()
            .position(|u| &u.id == user_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::User, *user_id))?;
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(StoreError::InvalidInput("Name must not be empty".into()));
            }
        }

        let mut updated = self.state.users[index].clone();
        if let Some(name) = update.name {
            updated.name = name.trim().to_string();
        }
        if let Some(bio) = update.bio {
            updated.bio = bio;
        }
        if let Some(settings) = update.settings {
            updated.settings = settings;
        }
        if updated == self.state.users[index] {
            return Ok(Outcome::Unchanged);
        }
        let previous = std::mem::replace(&mut self.state.users[index], updated);
        if let Err(err) = self.persist() {
            self.state.users[index] = previous;
            return Err(err);
        }
        self.notify(&StoreEvent::ProfileUpdated { user_id: *user_id });
        Ok(Outcome::Applied)
    }
}
