pub mod callback;
pub mod credentials;
pub mod flow;
pub mod signer;

pub use callback::{CallbackResult, CallbackServer, PendingCallback};
pub use credentials::{OAuthAppCredentials, OAuthUserGrant};
pub use flow::{LoginFlow, LoginOutcome};
pub use signer::{HmacSha1Signer, OAuthSigner, TokenPair};
