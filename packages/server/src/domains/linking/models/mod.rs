pub mod linked_identity;
pub mod start_session;

pub use linked_identity::LinkedIdentity;
pub use start_session::StartSession;
