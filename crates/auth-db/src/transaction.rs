//! Re-export of `auth_core::transaction::UnitOfWork`. The type lives in
//! `auth-core` (see its doc comment for why) -- this module keeps the
//! `auth_db::transaction::UnitOfWork` import path callers already use.

pub use auth_core::transaction::UnitOfWork;
