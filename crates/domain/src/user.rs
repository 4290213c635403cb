//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use connectlife_auth::Role;
use connectlife_core::{DomainError, DomainResult, UserId};

/// Profile picture assigned to accounts that never uploaded one.
pub const DEFAULT_PICTURE: &str = "/uploads/default-pfp.png";

/// A registered account.
///
/// # Invariants
/// - `email` is stored trimmed and lowercased; uniqueness is enforced at the
///   store boundary.
/// - `password_hash` never leaves the backend (response mapping strips it).
/// - `role` and `active` change only through the admin management path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub picture: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account from registration input.
    pub fn create(
        name: &str,
        email: &str,
        password_hash: String,
        role: Role,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        Ok(Self {
            id: UserId::new(),
            name: name.to_string(),
            email,
            password_hash,
            picture: DEFAULT_PICTURE.to_string(),
            role,
            active: true,
            created_at: now,
        })
    }

    /// Self-service profile edit: name and picture only.
    ///
    /// Role and active flag are structurally absent here; only
    /// [`User::apply_admin_edit`] can touch them.
    pub fn apply_self_edit(
        &mut self,
        name: Option<&str>,
        picture: Option<String>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name.to_string();
        }
        if let Some(picture) = picture {
            self.picture = picture;
        }
        Ok(())
    }

    /// Admin-side edit of another account.
    ///
    /// Email uniqueness against the rest of the store is the caller's problem;
    /// only shape is validated here.
    pub fn apply_admin_edit(&mut self, edit: AdminUserEdit) -> DomainResult<()> {
        if let Some(name) = edit.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name.to_string();
        }
        if let Some(email) = edit.email {
            let email = email.trim().to_lowercase();
            if email.is_empty() || !email.contains('@') {
                return Err(DomainError::validation("invalid email format"));
            }
            self.email = email;
        }
        if let Some(role) = edit.role {
            self.role = role;
        }
        if let Some(active) = edit.active {
            self.active = active;
        }
        match edit.picture {
            PictureEdit::Keep => {}
            PictureEdit::Set(path) => self.picture = path,
            PictureEdit::Reset => self.picture = DEFAULT_PICTURE.to_string(),
        }
        Ok(())
    }
}

/// Fields an admin may change on another account.
#[derive(Debug, Clone, Default)]
pub struct AdminUserEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub picture: PictureEdit,
}

/// Tri-state picture update: leave as-is, replace, or reset to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PictureEdit {
    #[default]
    Keep,
    Set(String),
    Reset,
}
