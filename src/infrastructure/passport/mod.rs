//! Passport infrastructure: in-memory storage and the passport service

pub mod repository;
pub mod service;

pub use repository::InMemoryPassportRepository;
pub use service::{CreatePassportRequest, PassportService, UpdatePassportRequest};
