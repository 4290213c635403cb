//! Sports venues ("locais"). Admin-managed, immutable after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use connectlife_core::{DomainError, DomainResult, UserId, VenueId};

/// Venue picture used when no image was uploaded.
pub const DEFAULT_PICTURE: &str = "/uploads/default-venue.png";

/// A physical sports location. Name uniqueness is enforced at the store
/// boundary; there is no update operation — venues are replaced, not edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub address: String,
    pub picture: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    pub fn create(
        name: &str,
        address: &str,
        picture: Option<String>,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() || address.is_empty() {
            return Err(DomainError::validation("name and address are required"));
        }

        Ok(Self {
            id: VenueId::new(),
            name: name.to_string(),
            address: address.to_string(),
            picture: picture.unwrap_or_else(|| DEFAULT_PICTURE.to_string()),
            created_by,
            created_at: now,
        })
    }
}
