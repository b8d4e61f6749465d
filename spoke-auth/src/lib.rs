//! OTP authentication against the users service
//!
//! The users service speaks one of two login contracts depending on the
//! deployment. [`AuthVersion::resolve`] maps an environment name onto the
//! contract, [`AuthFlow`] runs the two-step login-then-verify handshake for
//! that contract, and [`TokenCache`] keeps one token per virtual user for the
//! rest of the run. [`Authenticator`] ties the three together.

pub mod authenticator;
pub mod cache;
pub mod error;
pub mod flow;
pub mod protocol;
pub mod types;
pub mod version;

pub use authenticator::Authenticator;
pub use cache::{TokenCache, TokenCacheStats, TokenSlot};
pub use error::{AuthError, AuthResult, AuthStep};
pub use flow::AuthFlow;
pub use protocol::{AuthProtocol, V1Protocol, V2Protocol};
pub use types::{AuthTokens, Credentials, VuId};
pub use version::{resolve_environment, AuthVersion, BaseEnvironment, DEFAULT_ENVIRONMENT};
