pub mod session;
pub mod sts;

pub use session::{CredentialProvider, RoleSession, SessionCache, TemporaryCredentials};
pub use sts::StsCredentialProvider;
