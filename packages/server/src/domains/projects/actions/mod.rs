mod create_project;

pub use create_project::{authenticate_project, create_project};
