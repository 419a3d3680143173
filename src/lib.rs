//! # Twitter OAuth
//!
//! Cliente Rust para o login OAuth 1.0a de três etapas do Twitter.
//!
//! ## Features
//!
//! - Request token e URL de autorização
//! - Troca do `oauth_verifier` pelo access token do usuário
//! - Perfil do usuário via `account/verify_credentials.json`
//! - Assinatura HMAC-SHA1 atrás do trait [`OAuthSigner`]
//!
//! ## Exemplo
//!
//! ```no_run
//! use twitter_oauth::{OAuthAppCredentials, TwitterOAuthClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = OAuthAppCredentials::new(
//!         "consumer_key",
//!         "consumer_secret",
//!         "http://localhost:8888/callback",
//!     );
//!     let client = TwitterOAuthClient::new();
//!
//!     let url = client.login_url(&credentials).await?;
//!     println!("Autorize o app em: {}", url);
//!
//!     // Depois do redirect, com oauth_token e oauth_verifier em mãos:
//!     if let Some(grant) = client.verify_token("oauth_token", "oauth_verifier", &credentials.consumer_key).await? {
//!         if let Some(profile) = client.fetch_user_info(&grant, &credentials).await? {
//!             println!("Olá, @{}", profile.screen_name);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

/// Módulo de autenticação OAuth 1.0a
pub mod auth;

/// Módulo de cliente API
pub mod client;

/// Módulo de configuração
pub mod config;

/// Módulo de tratamento de erros
pub mod error;

// Re-exportações para conveniência
pub use auth::credentials::{OAuthAppCredentials, OAuthUserGrant};
pub use auth::flow::{LoginFlow, LoginOutcome};
pub use auth::signer::{HmacSha1Signer, OAuthSigner};
pub use client::api::{TwitterOAuthClient, UserProfile};
pub use config::EnvManager;
pub use error::{AuthError, AuthResult};
