use thiserror::Error;

/// Tipos de erro do fluxo OAuth 1.0a do Twitter
///
/// Resultados negativos esperados (verifier recusado, status != 200) não são
/// erros: as operações retornam `Ok(None)` nesses casos.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Erro de rede: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Erro de parsing de URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Request token recusado pelo Twitter (status {status}): {body}")]
    RequestTokenRejected { status: u16, body: String },

    #[error("Verifier inválido: {0}")]
    InvalidCode(String),

    #[error("Erro de variável de ambiente: {0}")]
    EnvError(String),

    #[error("Erro do servidor de callback: {0}")]
    CallbackServerError(String),

    #[error("Acesso negado pelo usuário")]
    AccessDenied,

    #[error("oauth_token do callback não confere com o request token")]
    InvalidState,

    #[error("Configuração inválida: {0}")]
    ConfigError(String),

    #[error("Erro de assinatura: {0}")]
    SignatureError(String),

    #[error("Timeout durante autenticação")]
    Timeout,

    #[error("Erro de parsing: {0}")]
    ParseError(String),

    #[error("Erro genérico: {0}")]
    Generic(String),
}

impl AuthError {
    pub fn env_error(msg: impl Into<String>) -> Self {
        Self::EnvError(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn callback_error(msg: impl Into<String>) -> Self {
        Self::CallbackServerError(msg.into())
    }

    pub fn signature_error(msg: impl Into<String>) -> Self {
        Self::SignatureError(msg.into())
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }
}

/// Tipo de resultado padrão para operações de autenticação
pub type AuthResult<T> = Result<T, AuthError>;
