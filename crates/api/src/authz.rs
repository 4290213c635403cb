//! Coarse role gating at the route boundary.
//!
//! This covers the role half of authorization; per-resource ownership is
//! deliberately separate (`connectlife_domain::policy`) because it depends on
//! the loaded resource instance, not just the caller's role.

use crate::app::errors::ApiError;
use crate::context::Caller;

/// Admit only administrators. Called at the top of admin-only handlers,
/// before any resource is loaded.
pub fn require_admin(caller: &Caller) -> Result<(), ApiError> {
    if caller.role().is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "administrator role required".to_string(),
        ))
    }
}
