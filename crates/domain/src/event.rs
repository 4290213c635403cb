//! Scheduled events, each tied to one community and one venue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use connectlife_core::{CommunityId, DomainError, DomainResult, EventId, VenueId};

/// A scheduled occurrence for a community at a venue.
///
/// The one-event-per-community invariant is a store property: inserting a new
/// event atomically replaces any prior events of the same community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub community: CommunityId,
    pub name: String,
    pub description: String,
    pub when_at: DateTime<Utc>,
    pub venue: VenueId,
    pub sport: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn create(
        community: CommunityId,
        name: &str,
        description: String,
        when_at: DateTime<Utc>,
        venue: VenueId,
        sport: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("event name cannot be empty"));
        }

        Ok(Self {
            id: EventId::new(),
            community,
            name: name.to_string(),
            description,
            when_at,
            venue,
            sport: if sport.trim().is_empty() {
                "Outro".to_string()
            } else {
                sport
            },
            created_at: now,
        })
    }
}
