// Business domains
pub mod admin;
pub mod linking;
pub mod projects;
pub mod verification;
