pub mod application;
pub mod profile;
pub mod user;
