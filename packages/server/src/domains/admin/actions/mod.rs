mod add_project;

pub use add_project::{
    cancel_add_project, confirm_add_project, start_add_project, submit_project_name,
    CallbackOutcome, NameOutcome,
};
