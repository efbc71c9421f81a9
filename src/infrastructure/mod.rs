//! Infrastructure layer - concrete storage, services and process plumbing

pub mod logging;
pub mod passport;
pub mod user;
