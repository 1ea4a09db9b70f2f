// [apps/api-server/src/handlers/mod.rs]
pub mod analysis;
pub mod auth;
pub mod devices;
pub mod documents;
pub mod folders;
pub mod members;
pub mod options;
pub mod projects;
pub mod topology;
pub mod users;
