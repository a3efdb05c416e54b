pub mod service;

pub use service::{record_best_effort, AuditAction, AuditLog, AuditService, NewAuditLog};
