//! Admin conversation rules that need no database.

use std::fmt;

use crate::common::AdminActionId;

/// Action type of the project provisioning conversation.
pub const ADD_PROJECT: &str = "add_project";

const CONFIRM_PREFIX: &str = "add_project_confirm:";
const CANCEL_PREFIX: &str = "add_project_cancel:";

/// An inline button press on the add-project confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCallback {
    Confirm(AdminActionId),
    Cancel(AdminActionId),
}

impl AdminCallback {
    /// Parse Telegram callback data. Unknown data yields `None`.
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(id) = data.strip_prefix(CONFIRM_PREFIX) {
            AdminActionId::parse(id).ok().map(Self::Confirm)
        } else if let Some(id) = data.strip_prefix(CANCEL_PREFIX) {
            AdminActionId::parse(id).ok().map(Self::Cancel)
        } else {
            None
        }
    }

    pub fn action_id(&self) -> AdminActionId {
        match self {
            Self::Confirm(id) | Self::Cancel(id) => *id,
        }
    }
}

impl fmt::Display for AdminCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirm(id) => write!(f, "{}{}", CONFIRM_PREFIX, id),
            Self::Cancel(id) => write!(f, "{}{}", CANCEL_PREFIX, id),
        }
    }
}

/// Accept a candidate project name. Blank text and anything that looks like
/// a command are refused.
pub fn validate_project_name(text: &str) -> Option<&str> {
    let name = text.trim();
    if name.is_empty() || name.starts_with('/') {
        None
    } else {
        Some(name)
    }
}
