use serde::Serialize;

use crate::auth::callback::CallbackServer;
use crate::auth::credentials::{OAuthAppCredentials, OAuthUserGrant};
use crate::client::api::{authorize_url, TwitterOAuthClient, UserProfile};
use crate::config::EnvManager;
use crate::error::{AuthError, AuthResult};

/// Resultado do login interativo
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub grant: OAuthUserGrant,
    pub profile: UserProfile,
}

/// Login interativo pelo navegador: request token, autorização, callback
/// local, troca do verifier e leitura do perfil. Nada é persistido.
#[derive(Debug)]
pub struct LoginFlow {
    client: TwitterOAuthClient,
    credentials: OAuthAppCredentials,
    callback_port: u16,
}

impl LoginFlow {
    /// Cria o fluxo a partir das variáveis de ambiente
    pub fn new() -> AuthResult<Self> {
        let env_manager = EnvManager::load()?;
        env_manager.validate()?;

        Ok(Self::from_config(&env_manager, TwitterOAuthClient::new()))
    }

    pub fn from_config(env_manager: &EnvManager, client: TwitterOAuthClient) -> Self {
        Self {
            client,
            credentials: env_manager.credentials(),
            callback_port: env_manager.callback_port,
        }
    }

    /// Executa o fluxo completo
    pub async fn run(&self) -> AuthResult<LoginOutcome> {
        log::info!("🔑 Iniciando login OAuth 1.0a no Twitter...");

        // 1. Request token
        let request_token = self.client.request_token(&self.credentials).await?;

        // 2. Servidor de callback antes de abrir o navegador
        let callback_server = CallbackServer::new(self.callback_port, request_token.clone());
        let server_handle = tokio::spawn(callback_server.start_and_wait());

        // 3. Abre o navegador
        let login_url = authorize_url(&request_token);
        if let Err(e) = webbrowser::open(&login_url) {
            log::warn!("⚠️ Não foi possível abrir o navegador automaticamente: {}", e);
            println!("🔗 Abra manualmente o link: {}", login_url);
        } else {
            log::info!("🌐 Navegador aberto automaticamente");
        }

        log::info!("⏳ Aguardando autorização do usuário...");

        // 4. Aguarda o redirect (timeout controlado pelo servidor)
        let callback = server_handle
            .await
            .map_err(|e| AuthError::generic(format!("Erro na thread do servidor: {}", e)))??;

        // 5. Verifier -> access token
        let grant = self
            .client
            .verify_token(&callback.oauth_token, &callback.oauth_verifier, &self.credentials.consumer_key)
            .await?
            .ok_or_else(|| AuthError::InvalidCode("Twitter recusou o oauth_verifier".to_string()))?;

        // 6. Perfil do usuário
        let profile = self
            .client
            .fetch_user_info(&grant, &self.credentials)
            .await?
            .ok_or_else(|| AuthError::generic("Twitter recusou as credenciais do usuário"))?;

        log::info!("✅ Login concluído para @{}", profile.screen_name);

        Ok(LoginOutcome { grant, profile })
    }
}
