use dotenv::dotenv;
use std::env;
use std::path::Path;

use crate::auth::credentials::OAuthAppCredentials;
use crate::error::{AuthError, AuthResult};

pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:8888/callback";
pub const DEFAULT_CALLBACK_PORT: u16 = 8888;

/// Gerenciador de variáveis de ambiente para o OAuth 1.0a do Twitter
#[derive(Debug, Clone)]
pub struct EnvManager {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub callback_url: String,
    pub callback_port: u16,
}

impl EnvManager {
    /// Carrega as configurações do ambiente (e do `.env`, se existir)
    pub fn load() -> AuthResult<Self> {
        // Durante testes, os testes configuram as variáveis diretamente
        if cfg!(not(test)) && Path::new(".env").exists() {
            dotenv().map_err(|e| AuthError::config_error(format!("Erro ao carregar .env: {}", e)))?;
        }

        let consumer_key = Self::get_env_var("TWITTER_CONSUMER_KEY")?;
        let consumer_secret = Self::get_env_var("TWITTER_CONSUMER_SECRET")?;

        let callback_url = env::var("TWITTER_CALLBACK_URL")
            .unwrap_or_else(|_| DEFAULT_CALLBACK_URL.to_string());

        let callback_port = env::var("CALLBACK_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_CALLBACK_PORT);

        log::debug!("Configuração carregada (callback: {}, porta: {})", callback_url, callback_port);

        Ok(Self {
            consumer_key,
            consumer_secret,
            callback_url,
            callback_port,
        })
    }

    /// Obtém variável de ambiente obrigatória
    fn get_env_var(key: &str) -> AuthResult<String> {
        env::var(key).map_err(|_| AuthError::env_error(format!("{} não encontrado", key)))
    }

    /// Valida se todas as configurações obrigatórias estão presentes
    pub fn validate(&self) -> AuthResult<()> {
        if self.consumer_key.is_empty() {
            return Err(AuthError::config_error("TWITTER_CONSUMER_KEY é obrigatório"));
        }

        if self.consumer_secret.is_empty() {
            return Err(AuthError::config_error("TWITTER_CONSUMER_SECRET é obrigatório"));
        }

        if !self.callback_url.starts_with("http://") && !self.callback_url.starts_with("https://") {
            return Err(AuthError::config_error("TWITTER_CALLBACK_URL deve ser uma URL válida"));
        }

        Ok(())
    }

    /// Credenciais do app para as operações do cliente
    pub fn credentials(&self) -> OAuthAppCredentials {
        OAuthAppCredentials::new(&self.consumer_key, &self.consumer_secret, &self.callback_url)
    }
}
