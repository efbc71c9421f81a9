//! Passport domain
//!
//! Identity documents tied to a user: entity, field validation and the
//! repository trait.

mod entity;
mod repository;
pub mod validation;

pub use entity::{NewPassport, Passport, PassportId};
pub use repository::PassportRepository;
pub use validation::PassportValidationError;

#[cfg(test)]
pub use repository::mock::MockPassportRepository;
