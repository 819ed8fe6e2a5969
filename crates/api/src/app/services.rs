//! Service wiring: the user store and the authenticator built on top of it.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use gatekeeper_auth::{BearerAuthenticator, IdentityResolver, Role, TokenCodec, UserLookup, UserRecord};
use gatekeeper_core::{DomainError, DomainResult, UserId};

use crate::config::Settings;

/// Shared services handed to every protected route.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub users: Arc<InMemoryUserStore>,
}

pub fn build_authenticator(settings: &Settings, users: Arc<InMemoryUserStore>) -> BearerAuthenticator {
    let codec = TokenCodec::with_system_clock(settings.secret_key.as_bytes());
    let resolver = IdentityResolver::new(users);
    BearerAuthenticator::new(codec, resolver)
}

/// Fields needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub verified: bool,
}

impl NewUser {
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: Role::User,
            verified: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.role = Role::Admin;
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEdit {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Default)]
struct Users {
    last_id: i64,
    by_id: BTreeMap<UserId, UserRecord>,
}

impl Users {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.by_id
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory user store for dev/tests.
///
/// Ids are assigned sequentially from 1; emails are unique (case-insensitive).
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Users>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, new: NewUser) -> DomainResult<UserRecord> {
        let email = normalize_email(&new.email)?;

        let mut users = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if users.email_taken(&email, None) {
            return Err(DomainError::conflict(format!("email '{email}' already registered")));
        }

        users.last_id += 1;
        let record = UserRecord {
            id: UserId::new(users.last_id),
            email,
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            role: new.role,
            banned: false,
            verified: new.verified,
        };
        users.by_id.insert(record.id, record.clone());

        tracing::info!(user_id = %record.id, role = %record.role, "user created");
        Ok(record)
    }

    pub fn get(&self, id: UserId) -> Option<UserRecord> {
        let users = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        users.by_id.get(&id).cloned()
    }

    pub fn list(&self) -> Vec<UserRecord> {
        let users = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        users.by_id.values().cloned().collect()
    }

    pub fn set_role(&self, id: UserId, role: Role) -> DomainResult<()> {
        self.modify(id, |u| u.role = role)
    }

    pub fn set_banned(&self, id: UserId, banned: bool) -> DomainResult<()> {
        self.modify(id, |u| u.banned = banned)
    }

    pub fn update(&self, id: UserId, edit: UserEdit) -> DomainResult<UserRecord> {
        let email = edit.email.as_deref().map(normalize_email).transpose()?;

        let mut users = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(email) = &email {
            if users.email_taken(email, Some(id)) {
                return Err(DomainError::conflict(format!("email '{email}' already registered")));
            }
        }

        let user = users.by_id.get_mut(&id).ok_or(DomainError::NotFound)?;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(first_name) = edit.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = edit.last_name {
            user.last_name = last_name.trim().to_string();
        }
        Ok(user.clone())
    }

    pub fn delete(&self, id: UserId) -> DomainResult<()> {
        let mut users = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        users.by_id.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    fn modify(&self, id: UserId, f: impl FnOnce(&mut UserRecord)) -> DomainResult<()> {
        let mut users = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let user = users.by_id.get_mut(&id).ok_or(DomainError::NotFound)?;
        f(user);
        Ok(())
    }
}

#[async_trait]
impl UserLookup for InMemoryUserStore {
    async fn find_user_by_id(&self, id: UserId) -> Option<UserRecord> {
        self.get(id)
    }
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}
