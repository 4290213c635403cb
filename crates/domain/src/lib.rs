//! `connectlife-domain` — entities and the ownership policy.
//!
//! Entity types carry their own construction/update validation; `policy`
//! holds the per-entity rules for who may mutate which resource instance.

pub mod community;
pub mod event;
pub mod policy;
pub mod user;
pub mod venue;

pub use community::{Community, CommunityEdit, MeetupSchedule, Message};
pub use event::Event;
pub use policy::{Actor, JoinDecision};
pub use user::{AdminUserEdit, PictureEdit, User};
pub use venue::Venue;
