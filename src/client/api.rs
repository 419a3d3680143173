use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::credentials::{preview, OAuthAppCredentials, OAuthUserGrant};
use crate::auth::signer::{HmacSha1Signer, OAuthSigner, TokenPair};
use crate::error::{AuthError, AuthResult};

pub const REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
pub const ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";
pub const VERIFY_CREDENTIALS_URL: &str = "https://api.twitter.com/1.1/account/verify_credentials.json";
pub const AUTHORIZE_URL: &str = "https://twitter.com/oauth/authorize";

/// Perfil retornado por `account/verify_credentials.json`
///
/// `location` e `description` podem vir `null` ou ausentes; viram string vazia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone)]
struct Endpoints {
    request_token: String,
    access_token: String,
    verify_credentials: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            request_token: REQUEST_TOKEN_URL.to_string(),
            access_token: ACCESS_TOKEN_URL.to_string(),
            verify_credentials: VERIFY_CREDENTIALS_URL.to_string(),
        }
    }
}

/// Cliente do fluxo OAuth 1.0a do Twitter
///
/// Não guarda estado entre chamadas: cada operação recebe as credenciais de
/// que precisa, então chamadas concorrentes para usuários diferentes não
/// interferem entre si.
#[derive(Debug, Clone, Default)]
pub struct TwitterOAuthClient {
    client: Client,
    endpoints: Endpoints,
}

impl TwitterOAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usa um `reqwest::Client` já configurado (proxy, timeouts, etc.)
    pub fn with_http_client(client: Client) -> Self {
        Self {
            client,
            endpoints: Endpoints::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            client: Client::new(),
            endpoints: Endpoints {
                request_token: format!("{}/oauth/request_token", base_url),
                access_token: format!("{}/oauth/access_token", base_url),
                verify_credentials: format!("{}/1.1/account/verify_credentials.json", base_url),
            },
        }
    }

    /// **PASSO 1: Request Token** - Obtém um request token temporário
    /// POST oauth/request_token (assinado, com `oauth_callback`)
    pub async fn request_token(&self, credentials: &OAuthAppCredentials) -> AuthResult<String> {
        let signer = HmacSha1Signer::for_twitter(credentials);
        self.request_token_with_signer(&signer).await
    }

    pub async fn request_token_with_signer(&self, signer: &dyn OAuthSigner) -> AuthResult<String> {
        let url = &self.endpoints.request_token;
        let auth_header = signer.request_token_header("POST", url)?;

        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, auth_header)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::warn!("❌ Twitter recusou o request token: status {}", status);
            return Err(AuthError::RequestTokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = url::form_urlencoded::parse(body.as_bytes())
            .find(|(key, _)| key == "oauth_token")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::parse_error("oauth_token ausente na resposta do request token"))?;

        log::info!("🔑 Request token obtido: {}", preview(&token));
        Ok(token)
    }

    /// **PASSO 2: Login URL** - URL para onde o usuário deve ser redirecionado
    pub async fn login_url(&self, credentials: &OAuthAppCredentials) -> AuthResult<String> {
        let token = self.request_token(credentials).await?;
        Ok(authorize_url(&token))
    }

    /// **PASSO 3: Verifier** - Troca o verifier do callback pelo access token
    /// POST oauth/access_token (sem assinatura, parâmetros na query)
    ///
    /// Status diferente de 200 ou resposta incompleta resultam em `Ok(None)`.
    pub async fn verify_token(
        &self,
        oauth_token: &str,
        oauth_verifier: &str,
        consumer_key: &str,
    ) -> AuthResult<Option<OAuthUserGrant>> {
        let url = format!(
            "{}?oauth_token={}&oauth_verifier={}&oauth_consumer_key={}",
            self.endpoints.access_token, oauth_token, oauth_verifier, consumer_key
        );

        log::debug!("POST {}", self.endpoints.access_token);

        let response = self.client.post(&url).send().await?;

        if response.status() != StatusCode::OK {
            log::warn!("❌ Verifier recusado: status {}", response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        let grant = OAuthUserGrant::from_access_token_response(&body);

        match &grant {
            Some(grant) => log::info!("✅ Access token obtido para user_id {}", grant.user_id),
            None => log::warn!("❌ Resposta do access token incompleta"),
        }

        Ok(grant)
    }

    /// **PASSO 4: Perfil** - Obtém o perfil do usuário autenticado
    /// GET 1.1/account/verify_credentials.json (assinado com o token do usuário)
    pub async fn fetch_user_info(
        &self,
        grant: &OAuthUserGrant,
        credentials: &OAuthAppCredentials,
    ) -> AuthResult<Option<UserProfile>> {
        let signer = HmacSha1Signer::for_twitter(credentials);
        self.fetch_user_info_with_signer(grant, &signer).await
    }

    pub async fn fetch_user_info_with_signer(
        &self,
        grant: &OAuthUserGrant,
        signer: &dyn OAuthSigner,
    ) -> AuthResult<Option<UserProfile>> {
        let url = &self.endpoints.verify_credentials;
        let token = TokenPair::new(&grant.oauth_token, &grant.oauth_token_secret);
        let auth_header = signer.authorization_header("GET", url, Some(token))?;

        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth_header)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            log::warn!("❌ verify_credentials retornou status {}", response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        let profile: UserProfile = serde_json::from_str(&body)?;

        log::info!("👤 Perfil obtido: @{}", profile.screen_name);
        Ok(Some(profile))
    }
}

/// URL de autorização para um request token (substituição direta, sem encoding)
pub fn authorize_url(request_token: &str) -> String {
    format!("{}?oauth_token={}", AUTHORIZE_URL, request_token)
}
