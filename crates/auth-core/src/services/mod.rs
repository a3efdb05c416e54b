pub mod login;
pub mod notification;
pub mod otp;
pub mod session;
pub mod signup;
pub mod token;

pub use login::*;
pub use notification::*;
pub use otp::*;
pub use session::*;
pub use signup::*;
pub use token::*;
