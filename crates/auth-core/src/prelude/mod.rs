//! Convenience re-exports for callers that want the whole public surface
//! without naming each submodule.

pub use crate::error::AuthError;
pub use crate::masking::{mask_email, mask_mobile};
pub use crate::models::*;
pub use crate::repository::{
    AccountTypeRepository, CustomerFilter, CustomerRepository, NewCustomer, Pagination,
};
pub use crate::services::login::{ForgotPasswordResult, LoginFlow, LoginResult};
pub use crate::services::notification::{LoggingNotifier, NotifyError, Notifier};
pub use crate::services::otp::{OtpEngine, OtpRepository};
pub use crate::services::session::{ClientMeta, SessionRepository, SessionService};
pub use crate::services::signup::{SignupFlow, SignupResult, VerifyOtpResult};
pub use crate::services::token::{TokenEngine, TokenFamily, TokenPair};
