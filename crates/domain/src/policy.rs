//! Ownership policy: who may mutate which resource instance.
//!
//! Every rule is a pure function over an [`Actor`] and an already-loaded
//! resource — no IO, no panics, no transport types. Handlers run these after
//! the authorization gate has established the caller and after the target
//! resource has been fetched.
//!
//! Self-service profile edits need no predicate here: the self-edit input is
//! structurally unable to carry role or active-flag changes (see
//! `user::User::apply_self_edit`).

use connectlife_auth::Role;
use connectlife_core::{DomainError, DomainResult, UserId};

use crate::community::Community;

/// The authenticated caller, as established by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Outcome of a join check against an open community.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    /// Not yet a member; admit and record.
    Admit,
    /// Already a member; succeed without mutation.
    AlreadyMember,
}

/// Community configuration edits: owner only, and never on private chats.
pub fn community_edit(actor: Actor, community: &Community) -> DomainResult<()> {
    if !community.is_group {
        return Err(DomainError::forbidden(
            "private chats cannot be reconfigured",
        ));
    }
    if community.owner != actor.id {
        return Err(DomainError::forbidden(
            "only the owner can edit this community",
        ));
    }
    Ok(())
}

/// Community deletion: admin role required, even for the owner.
pub fn community_delete(actor: Actor, community: &Community) -> DomainResult<()> {
    if !actor.role.is_admin() {
        return Err(DomainError::forbidden(
            "only an administrator can delete a community",
        ));
    }
    if !community.is_group {
        return Err(DomainError::forbidden(
            "only group communities can be deleted",
        ));
    }
    Ok(())
}

/// Self-service join: open groups only; re-joining is an idempotent success.
pub fn community_join(actor: Actor, community: &Community) -> DomainResult<JoinDecision> {
    if !community.is_group || !community.open {
        return Err(DomainError::forbidden(
            "this community is not open to new members",
        ));
    }
    if community.is_member(actor.id) {
        return Ok(JoinDecision::AlreadyMember);
    }
    Ok(JoinDecision::Admit)
}

/// Event creation: only the owner of the hosting community schedules events.
pub fn event_create(actor: Actor, community: &Community) -> DomainResult<()> {
    if community.owner != actor.id {
        return Err(DomainError::forbidden(
            "only the community owner can schedule its event",
        ));
    }
    Ok(())
}

/// Venue create/delete: administrators only.
pub fn venue_manage(actor: Actor) -> DomainResult<()> {
    if !actor.role.is_admin() {
        return Err(DomainError::forbidden(
            "only an administrator can manage venues",
        ));
    }
    Ok(())
}

/// Admin-side account management. Admins may act on any account but their
/// own: self-edits go through the self-service path (or another admin), so an
/// administrator cannot silently lock itself out.
pub fn user_admin_manage(actor: Actor, target: UserId) -> DomainResult<()> {
    if !actor.role.is_admin() {
        return Err(DomainError::forbidden(
            "only an administrator can manage other accounts",
        ));
    }
    if actor.id == target {
        return Err(DomainError::forbidden(
            "administrators cannot manage their own account through this path",
        ));
    }
    Ok(())
}

/// Message read/post: current members only.
pub fn message_post(actor: Actor, community: &Community) -> DomainResult<()> {
    if !community.is_member(actor.id) {
        return Err(DomainError::forbidden(
            "only members can use this community's chat",
        ));
    }
    Ok(())
}
