//! Chat texts sent by the bot.

use crate::domains::projects::models::Project;

pub const START_USAGE: &str = "Hello! Please open the link you were given, or send /start followed by the project code.";
pub const PROJECT_NOT_FOUND: &str = "Project code not found or inactive.";
pub const SHARE_PHONE: &str = "Hello! Please share your phone number.";
pub const SHARE_PHONE_BUTTON: &str = "Share phone number";
pub const PHONE_UNREADABLE: &str = "Could not read the phone number. Please send it again.";
pub const NOT_OWN_CONTACT: &str = "Please share your own phone number using the button.";
pub const SESSION_NOT_FOUND: &str = "Session not found. Please send /start <project_code>.";
pub const PROJECT_INACTIVE: &str = "This project is not active.";
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again later.";
pub const DEFAULT_PROMPT: &str = "Please press /start or share your phone number.";

pub const PERMISSION_DENIED: &str = "Permission denied.";
pub const ASK_PROJECT_NAME: &str = "Send the name of the new project.";
pub const NAME_AS_PLAIN_TEXT: &str = "Send the project name as plain text.";
pub const CONFIRM_BUTTON: &str = "Confirm";
pub const CANCEL_BUTTON: &str = "Cancel";
pub const SESSION_EXPIRED: &str = "Session expired.";
pub const CREATED_TOAST: &str = "Created.";
pub const CANCELLED_TOAST: &str = "Cancelled.";
pub const CREATION_CANCELLED: &str = "Project creation cancelled.";

pub fn phone_linked(phone: &str) -> String {
    format!("Your number is linked: {}", phone)
}

pub fn confirm_project_name(name: &str) -> String {
    format!("Project name: {}\nConfirm?", name)
}

pub fn project_created(project: &Project) -> String {
    format!(
        "Project created.\nName: {}\nID: {}\nAPI-KEY: {}\nCode: {}",
        project.name, project.id, project.api_key, project.invite_code
    )
}
