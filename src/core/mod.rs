pub mod config;
pub mod constants;
pub mod conversation;
pub mod credential;
pub mod session;
