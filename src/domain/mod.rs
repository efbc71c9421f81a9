//! Domain layer - entities, validation and repository contracts

pub mod dates;
pub mod error;
pub mod passport;
pub mod user;

pub use error::DomainError;
pub use passport::{NewPassport, Passport, PassportId, PassportRepository};
pub use user::{NameFilter, NewUser, User, UserId, UserRepository};
