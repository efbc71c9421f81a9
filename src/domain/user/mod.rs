//! User domain
//!
//! Person records: entity, field validation/normalization and the
//! repository trait the service layer depends on.

mod entity;
mod repository;
pub mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::{NameFilter, UserRepository};
pub use validation::UserValidationError;

#[cfg(test)]
pub use repository::mock::MockUserRepository;
