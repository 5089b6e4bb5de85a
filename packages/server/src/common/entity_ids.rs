//! Typed ids for every persisted entity.

pub use super::id::Id;

/// Marker for tenant projects.
pub struct Project;

/// Marker for deep-link start sessions.
pub struct StartSession;

/// Marker for (project, phone) to chat bindings.
pub struct LinkedIdentity;

/// Marker for issued one-time codes.
pub struct VerificationCode;

/// Marker for admin chat conversations.
pub struct AdminAction;

pub type ProjectId = Id<Project>;
pub type StartSessionId = Id<StartSession>;
pub type LinkedIdentityId = Id<LinkedIdentity>;
pub type VerificationCodeId = Id<VerificationCode>;
pub type AdminActionId = Id<AdminAction>;
