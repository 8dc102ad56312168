pub mod auth;
pub mod navigation;
pub mod notices;
pub mod preferences;
pub mod session;
