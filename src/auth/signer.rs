use oauthcli::{OAuthAuthorizationHeaderBuilder, SignatureMethod};
use url::Url;

use crate::auth::credentials::OAuthAppCredentials;
use crate::error::{AuthError, AuthResult};

/// Par token/secret do usuário usado para assinar requisições autenticadas
#[derive(Debug, Clone, Copy)]
pub struct TokenPair<'a> {
    pub token: &'a str,
    pub secret: &'a str,
}

impl<'a> TokenPair<'a> {
    pub fn new(token: &'a str, secret: &'a str) -> Self {
        Self { token, secret }
    }
}

/// Capacidade de assinatura OAuth 1.0a
///
/// Isola a geração do header `Authorization` das operações do cliente, de
/// forma que outra implementação possa ser usada sem alterar o fluxo.
pub trait OAuthSigner: Send + Sync {
    /// Header `Authorization` para uma requisição assinada, opcionalmente
    /// em nome de um usuário
    fn authorization_header(
        &self,
        method: &str,
        url: &str,
        token: Option<TokenPair<'_>>,
    ) -> AuthResult<String>;

    /// Header `Authorization` para o passo de request token (inclui `oauth_callback`)
    fn request_token_header(&self, method: &str, url: &str) -> AuthResult<String>;
}

/// Assinador HMAC-SHA1 sobre o `oauthcli`, no formato que o Twitter espera
#[derive(Debug, Clone)]
pub struct HmacSha1Signer {
    consumer_key: String,
    consumer_secret: String,
    callback_url: Option<String>,
}

impl HmacSha1Signer {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            callback_url: None,
        }
    }

    /// Assinador com as credenciais e o callback do app
    pub fn for_twitter(credentials: &OAuthAppCredentials) -> Self {
        Self::new(&credentials.consumer_key, &credentials.consumer_secret)
            .with_callback(&credentials.callback_url)
    }

    pub fn with_callback(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    fn build_header(
        &self,
        method: &str,
        url: &str,
        token: Option<TokenPair<'_>>,
        callback: Option<&str>,
        fixed: Option<(&str, u64)>,
    ) -> AuthResult<String> {
        let url = Url::parse(url)?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(AuthError::signature_error(format!("URL sem host: {}", url)));
        }

        let oauth_url = url1::Url::parse(url.as_str())
            .map_err(|e| AuthError::signature_error(format!("URL inválida: {}", e)))?;
        let mut builder = OAuthAuthorizationHeaderBuilder::new(
            method,
            &oauth_url,
            self.consumer_key.as_str(),
            self.consumer_secret.as_str(),
            SignatureMethod::HmacSha1,
        );

        if let Some(token) = token {
            builder.token(token.token, token.secret);
        }

        if let Some(callback) = callback {
            builder.callback(callback);
        }

        if let Some((nonce, timestamp)) = fixed {
            builder.nonce(nonce).timestamp(timestamp);
        }

        log::debug!("{}", signing_summary(method, &url, token.is_some()));

        Ok(builder.finish_for_twitter().to_string())
    }
}

impl OAuthSigner for HmacSha1Signer {
    fn authorization_header(
        &self,
        method: &str,
        url: &str,
        token: Option<TokenPair<'_>>,
    ) -> AuthResult<String> {
        self.build_header(method, url, token, None, None)
    }

    fn request_token_header(&self, method: &str, url: &str) -> AuthResult<String> {
        self.build_header(method, url, None, self.callback_url.as_deref(), None)
    }
}

/// Resumo logável: sem query, chaves ou tokens
fn signing_summary(method: &str, url: &Url, with_user_token: bool) -> String {
    format!(
        "Assinando {} {}{} (token de usuário: {})",
        method,
        url.host_str().unwrap_or_default(),
        url.path(),
        with_user_token
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PHOTOS_URL: &str = "http://photos.example.net/photos?file=vacation.jpg&size=original";

    fn photos_signer() -> HmacSha1Signer {
        HmacSha1Signer::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
    }

    fn photos_header(secret: &str) -> String {
        photos_signer()
            .build_header(
                "GET",
                PHOTOS_URL,
                Some(TokenPair::new("nnch734d00sl2jdk", secret)),
                None,
                Some(("kllo9940pd9333jh", 1191242096)),
            )
            .unwrap()
    }

    #[test]
    fn test_header_is_deterministic_with_fixed_nonce() {
        let first = photos_header("pfkkdhi9sl3r4s00");
        let second = photos_header("pfkkdhi9sl3r4s00");

        assert_eq!(first, second);
        assert!(first.starts_with("OAuth "));
        assert!(first.contains("oauth_consumer_key=\"dpf43f3p2l4k3l03\""));
        assert!(first.contains("oauth_token=\"nnch734d00sl2jdk\""));
        assert!(first.contains("oauth_nonce=\"kllo9940pd9333jh\""));
        assert!(first.contains("oauth_timestamp=\"1191242096\""));
        assert!(first.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(first.contains("oauth_signature="));
        // Parâmetros da query entram só na assinatura
        assert!(!first.contains("vacation.jpg"));
    }

    #[test]
    fn test_token_secret_changes_signature() {
        assert_ne!(photos_header("pfkkdhi9sl3r4s00"), photos_header("outro-secret"));
    }

    #[test]
    fn test_request_token_header_includes_callback() {
        let credentials = OAuthAppCredentials::new("key", "secret", "http://localhost:8888/callback");
        let signer = HmacSha1Signer::for_twitter(&credentials);

        let header = signer
            .request_token_header("POST", "https://api.twitter.com/oauth/request_token")
            .unwrap();
        assert!(header.contains("oauth_callback="));
        assert!(!header.contains("oauth_token="));

        let header = signer
            .authorization_header(
                "GET",
                "https://api.twitter.com/1.1/account/verify_credentials.json",
                Some(TokenPair::new("user-token", "user-secret")),
            )
            .unwrap();
        assert!(!header.contains("oauth_callback"));
        assert!(header.contains("oauth_token=\"user-token\""));
    }

    #[test]
    fn test_random_nonce_per_header() {
        let signer = HmacSha1Signer::new("key", "secret");
        let url = "https://api.twitter.com/oauth/request_token";

        let first = signer.authorization_header("POST", url, None).unwrap();
        let second = signer.authorization_header("POST", url, None).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let signer = HmacSha1Signer::new("key", "secret");

        let result = signer.authorization_header("GET", "not a url", None);
        assert!(matches!(result, Err(AuthError::UrlParseError(_))));

        let result = signer.authorization_header("GET", "mailto:someone@example.com", None);
        assert!(matches!(result, Err(AuthError::SignatureError(_))));
    }

    #[test]
    fn test_secrets_are_not_in_header() {
        let header = photos_header("pfkkdhi9sl3r4s00");
        assert!(!header.contains("kd94hf93k423kf44"));
        assert!(!header.contains("pfkkdhi9sl3r4s00"));
    }

    #[test]
    fn test_signing_summary_hides_credentials() {
        let url = Url::parse("https://api.twitter.com/oauth/access_token?oauth_token=SECRET_TOKEN").unwrap();
        let summary = signing_summary("POST", &url, true);

        assert_eq!(summary, "Assinando POST api.twitter.com/oauth/access_token (token de usuário: true)");
        assert!(!summary.contains("SECRET_TOKEN"));
    }
}
