//! Communities (group chats) and their embedded messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use connectlife_core::{CommunityId, DomainError, DomainResult, MessageId, UserId};

/// Group picture assigned to communities that never uploaded one.
pub const DEFAULT_PICTURE: &str = "/uploads/default-group.png";

/// Recurring meetup details announced on a community card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupSchedule {
    /// Weekday names, free-form (e.g. "Segunda", "Quarta").
    pub weekdays: Vec<String>,
    /// Meeting time, free-form (e.g. "19:30").
    pub time: String,
}

/// A chat message. Append-only: never edited or deleted, and its lifetime is
/// bound to the owning community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: UserId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// A sport community with its member set and embedded message list.
///
/// # Invariants
/// - The owner is always a member.
/// - `members` has set semantics: joining twice leaves one entry.
/// - `open == false` (the default) blocks self-service joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    pub is_group: bool,
    pub name: String,
    pub description: String,
    pub owner: UserId,
    pub members: Vec<UserId>,
    pub picture: String,
    pub open: bool,
    /// Sport tag, matched case-insensitively when filtering. Free-form, with
    /// "Futebol", "Basquete", "Vôlei", "Tênis", "Corrida" and "Outro" as the
    /// conventional values.
    pub sport: String,
    pub meetup: MeetupSchedule,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// Create a group community. The creator becomes owner and is always a
    /// member; duplicate initial members collapse.
    pub fn create_group(
        owner: UserId,
        name: &str,
        description: String,
        sport: String,
        initial_members: Vec<UserId>,
        picture: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("community name cannot be empty"));
        }

        let mut members = vec![owner];
        for m in initial_members {
            if !members.contains(&m) {
                members.push(m);
            }
        }

        Ok(Self {
            id: CommunityId::new(),
            is_group: true,
            name: name.to_string(),
            description,
            owner,
            members,
            picture: picture.unwrap_or_else(|| DEFAULT_PICTURE.to_string()),
            open: false,
            sport: if sport.trim().is_empty() {
                "Outro".to_string()
            } else {
                sport
            },
            meetup: MeetupSchedule::default(),
            messages: Vec::new(),
            created_at: now,
        })
    }

    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Add a member. Returns `false` (and leaves the set untouched) if the
    /// user already belongs, making repeated joins idempotent.
    pub fn add_member(&mut self, user: UserId) -> bool {
        if self.is_member(user) {
            return false;
        }
        self.members.push(user);
        true
    }

    /// Append a message from a member. Membership is checked by the ownership
    /// policy before this is called; content shape is validated here.
    pub fn append_message(
        &mut self,
        sender: UserId,
        content: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Message> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("message content cannot be empty"));
        }

        let message = Message {
            id: MessageId::new(),
            sender,
            content: content.to_string(),
            sent_at: now,
        };
        self.messages.push(message.clone());
        Ok(message)
    }

    /// Apply an owner-side configuration edit. Authorization (owner-only,
    /// groups-only) is the ownership policy's job.
    pub fn apply_edit(&mut self, edit: CommunityEdit) -> DomainResult<()> {
        if let Some(name) = edit.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("community name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(sport) = edit.sport {
            self.sport = sport;
        }
        if let Some(open) = edit.open {
            self.open = open;
        }
        if let Some(picture) = edit.picture {
            self.picture = picture;
        }
        if let Some(time) = edit.meetup_time {
            self.meetup.time = time;
        }
        if let Some(weekdays) = edit.meetup_weekdays {
            self.meetup.weekdays = weekdays;
        }
        Ok(())
    }
}

/// Owner-editable configuration fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CommunityEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sport: Option<String>,
    pub open: Option<bool>,
    pub picture: Option<String>,
    pub meetup_time: Option<String>,
    pub meetup_weekdays: Option<Vec<String>>,
}
