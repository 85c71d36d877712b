mod credentials;
mod token_store;

pub use credentials::CredentialProvider;
pub use token_store::{FileTokenStore, StaticTokenStore, TokenStore};
