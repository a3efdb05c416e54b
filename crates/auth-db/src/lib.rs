//! Database layer: sqlx-backed implementations of the `auth-core`
//! repository contracts, plus the transaction boundary that wraps them.
//! Migrations are plain SQL under the workspace `migrations/` directory,
//! run with `sqlx::migrate!()` from the binary, not a Rust module here.

pub mod connection;
pub mod repositories;
pub mod transaction;

pub use connection::create_mysql_pool;
pub use repositories::*;
pub use transaction::UnitOfWork;
