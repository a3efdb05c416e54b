//! Database repository modules

pub mod customer_repository;
pub mod otp_repository;
pub mod session_repository;

pub use customer_repository::{AccountTypeRepository, CustomerRepository};
pub use otp_repository::OtpRepository;
pub use session_repository::SessionRepository;
