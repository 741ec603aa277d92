pub mod admin;
pub mod auth;
pub mod bugs;
pub mod dashboard;
pub mod init;
