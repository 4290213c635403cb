use connectlife_auth::Role;
use connectlife_core::UserId;
use connectlife_domain::Actor;

/// Authenticated caller for a request (identity + role).
///
/// Inserted by the authorization gate; the only source of trust for "who is
/// calling". Handlers must never take identity fields from request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    role: Role,
}

impl Caller {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The caller as an ownership-policy actor.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}
