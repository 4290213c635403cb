//! The document collections and their domain queries.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use connectlife_core::{CommunityId, EventId, UserId, VenueId};
use connectlife_domain::{Community, Event, User, Venue};

use crate::StoreError;

/// In-memory document store: one map per collection.
///
/// Reads clone documents out (the store owns canonical state); writers that
/// mutate a loaded copy persist it back with an upsert, last write winning.
#[derive(Debug, Default)]
pub struct Documents {
    users: RwLock<HashMap<UserId, User>>,
    communities: RwLock<HashMap<CommunityId, Community>>,
    venues: RwLock<HashMap<VenueId, Venue>>,
    events: RwLock<HashMap<EventId, Event>>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- users ----

    /// Insert a new account; the unique-email probe and the insert run under
    /// one write guard.
    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut map = self.users.write().map_err(|_| StoreError::poisoned())?;
        if map.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        map.insert(user.id, user);
        Ok(())
    }

    /// Persist changes to an existing account. Rejects an email already held
    /// by a different account.
    pub fn update_user(&self, user: User) -> Result<(), StoreError> {
        let mut map = self.users.write().map_err(|_| StoreError::poisoned())?;
        if map
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::DuplicateEmail);
        }
        map.insert(user.id, user);
        Ok(())
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.read().ok()?.get(&id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let map = self.users.read().ok()?;
        map.values().find(|u| u.email == email).cloned()
    }

    pub fn list_users(&self) -> Vec<User> {
        let map = match self.users.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut users: Vec<User> = map.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }

    pub fn remove_user(&self, id: UserId) -> Option<User> {
        self.users.write().ok()?.remove(&id)
    }

    // ---- communities ----

    pub fn upsert_community(&self, community: Community) {
        if let Ok(mut map) = self.communities.write() {
            map.insert(community.id, community);
        }
    }

    pub fn community(&self, id: CommunityId) -> Option<Community> {
        self.communities.read().ok()?.get(&id).cloned()
    }

    /// Communities a user belongs to (their chat sidebar).
    pub fn communities_with_member(&self, user: UserId) -> Vec<Community> {
        let map = match self.communities.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values()
            .filter(|c| c.is_member(user))
            .cloned()
            .collect()
    }

    /// All group communities (admin overview), newest first.
    pub fn group_communities(&self) -> Vec<Community> {
        let map = match self.communities.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut groups: Vec<Community> = map.values().filter(|c| c.is_group).cloned().collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        groups
    }

    /// Open group communities, newest first, optionally filtered by a
    /// case-insensitive sport substring.
    pub fn open_groups(&self, sport: Option<&str>) -> Vec<Community> {
        let filter = sport.map(str::to_lowercase);
        let mut groups: Vec<Community> = match self.communities.read() {
            Ok(map) => map
                .values()
                .filter(|c| c.is_group && c.open)
                .filter(|c| match &filter {
                    Some(needle) => c.sport.to_lowercase().contains(needle),
                    None => true,
                })
                .cloned()
                .collect(),
            Err(_) => return vec![],
        };
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        groups
    }

    pub fn remove_community(&self, id: CommunityId) -> Option<Community> {
        self.communities.write().ok()?.remove(&id)
    }

    // ---- venues ----

    /// Insert a venue; unique-name probe and insert under one write guard.
    pub fn insert_venue(&self, venue: Venue) -> Result<(), StoreError> {
        let mut map = self.venues.write().map_err(|_| StoreError::poisoned())?;
        if map.values().any(|v| v.name == venue.name) {
            return Err(StoreError::DuplicateVenueName);
        }
        map.insert(venue.id, venue);
        Ok(())
    }

    pub fn venue(&self, id: VenueId) -> Option<Venue> {
        self.venues.read().ok()?.get(&id).cloned()
    }

    /// All venues, ordered by name.
    pub fn list_venues(&self) -> Vec<Venue> {
        let map = match self.venues.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut venues: Vec<Venue> = map.values().cloned().collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        venues
    }

    pub fn remove_venue(&self, id: VenueId) -> Option<Venue> {
        self.venues.write().ok()?.remove(&id)
    }

    // ---- events ----

    /// Persist a community's event, dropping any events the community already
    /// had. Removal and insert happen under a single write guard, so at most
    /// one event per community is ever observable and a failure cannot leave
    /// the community event-less with the old one gone.
    ///
    /// Returns how many prior events were replaced.
    pub fn replace_community_event(&self, event: Event) -> Result<usize, StoreError> {
        let mut map = self.events.write().map_err(|_| StoreError::poisoned())?;
        let before = map.len();
        map.retain(|_, e| e.community != event.community);
        let replaced = before - map.len();
        map.insert(event.id, event);
        Ok(replaced)
    }

    /// All events ordered by date ascending; `after` keeps only events at or
    /// past the given instant (the "future only" listing).
    pub fn list_events(&self, after: Option<DateTime<Utc>>) -> Vec<Event> {
        let map = match self.events.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut events: Vec<Event> = map
            .values()
            .filter(|e| match after {
                Some(cutoff) => e.when_at >= cutoff,
                None => true,
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| a.when_at.cmp(&b.when_at));
        events
    }

    /// Events hosted by a community (used when a community is deleted).
    pub fn remove_events_for_community(&self, community: CommunityId) -> usize {
        let mut map = match self.events.write() {
            Ok(m) => m,
            Err(_) => return 0,
        };
        let before = map.len();
        map.retain(|_, e| e.community != community);
        before - map.len()
    }
}
