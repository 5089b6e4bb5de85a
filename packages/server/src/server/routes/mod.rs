// HTTP routes
pub mod auth;
pub mod health;
pub mod input;
pub mod notify;
pub mod projects;

pub use auth::*;
pub use health::*;
pub use input::ScalarInput;
pub use notify::*;
pub use projects::*;
