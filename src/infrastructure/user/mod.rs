//! User infrastructure: in-memory storage and the user service

pub mod repository;
pub mod service;

pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
