use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::Filter;

use crate::error::{AuthError, AuthResult};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Servidor HTTP local para capturar o redirect do Twitter após a autorização
pub struct CallbackServer {
    port: u16,
    request_token: String,
}

/// Parâmetros do redirect do Twitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackResult {
    pub oauth_token: String,
    pub oauth_verifier: String,
}

impl CallbackServer {
    /// Cria um servidor que aceita apenas o redirect do `request_token` informado
    pub fn new(port: u16, request_token: String) -> Self {
        Self { port, request_token }
    }

    /// Inicia o servidor e aguarda o callback
    pub async fn start_and_wait(self) -> AuthResult<CallbackResult> {
        let (_, pending) = self.start()?;
        pending.wait().await
    }

    /// Faz o bind e inicia o servidor em background
    ///
    /// Retorna o endereço efetivo (útil com porta 0) e o callback pendente.
    /// Precisa ser chamado dentro de um runtime tokio.
    pub fn start(self) -> AuthResult<(SocketAddr, PendingCallback)> {
        let expected_token = self.request_token.clone();
        let (tx, rx) = oneshot::channel::<AuthResult<CallbackResult>>();
        let tx = Arc::new(Mutex::new(Some(tx)));

        let callback_route = warp::path("callback")
            .and(warp::path::end())
            .and(warp::query::<HashMap<String, String>>())
            .map(move |params: HashMap<String, String>| {
                log::info!("Recebido callback do Twitter");

                let result = Self::process_callback(&params, &expected_token);
                let page = if result.is_ok() { SUCCESS_PAGE } else { ERROR_PAGE };

                if let Ok(mut sender) = tx.lock() {
                    if let Some(tx) = sender.take() {
                        let _ = tx.send(result);
                    }
                }

                warp::reply::html(page)
            });

        let status_route = warp::path::end().map(|| warp::reply::html(WAITING_PAGE));

        let routes = callback_route
            .or(status_route)
            .with(warp::filters::log::log("callback_server"));

        let (actual_addr, server_future) = warp::serve(routes)
            .try_bind_ephemeral(([127, 0, 0, 1], self.port))
            .map_err(|e| AuthError::callback_error(format!("Failed to bind server: {}", e)))?;

        log::info!("Servidor de callback iniciado em: http://{}", actual_addr);

        let pending = PendingCallback {
            rx,
            server_task: tokio::spawn(server_future),
        };

        Ok((actual_addr, pending))
    }

    /// Processa os parâmetros do redirect
    ///
    /// O Twitter envia `denied=<token>` quando o usuário recusa o acesso e
    /// `oauth_token` + `oauth_verifier` quando autoriza.
    fn process_callback(
        params: &HashMap<String, String>,
        expected_token: &str,
    ) -> AuthResult<CallbackResult> {
        if params.contains_key("denied") {
            return Err(AuthError::AccessDenied);
        }

        let oauth_token = params.get("oauth_token").ok_or(AuthError::InvalidState)?;
        if oauth_token != expected_token {
            return Err(AuthError::InvalidState);
        }

        let oauth_verifier = params
            .get("oauth_verifier")
            .filter(|verifier| !verifier.is_empty())
            .ok_or_else(|| AuthError::InvalidCode("oauth_verifier não encontrado no callback".to_string()))?;

        Ok(CallbackResult {
            oauth_token: oauth_token.clone(),
            oauth_verifier: oauth_verifier.clone(),
        })
    }
}

/// Callback ainda não recebido; o servidor continua rodando até `wait` terminar
pub struct PendingCallback {
    rx: oneshot::Receiver<AuthResult<CallbackResult>>,
    server_task: JoinHandle<()>,
}

impl PendingCallback {
    /// Aguarda o redirect por até 5 minutos e encerra o servidor
    pub async fn wait(self) -> AuthResult<CallbackResult> {
        let result = tokio::time::timeout(CALLBACK_TIMEOUT, self.rx).await;
        self.server_task.abort();

        match result {
            Ok(Ok(callback_result)) => callback_result,
            Ok(Err(_)) => Err(AuthError::callback_error("Canal de comunicação fechado")),
            Err(_) => Err(AuthError::Timeout),
        }
    }
}

const WAITING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Twitter OAuth - Aguardando</title></head>
<body style="font-family: Arial, sans-serif; text-align: center; padding: 40px;">
    <h1 style="color: #1da1f2;">🔐 Twitter OAuth</h1>
    <p>Aguardando autorização no Twitter...</p>
</body>
</html>
"#;

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Twitter OAuth - Autorização Concluída</title></head>
<body style="font-family: Arial, sans-serif; text-align: center; padding: 40px;">
    <h1 style="color: #28a745;">✅ Autorização Concluída!</h1>
    <p>Você pode fechar esta janela e retornar à aplicação.</p>
    <script>setTimeout(() => window.close(), 3000);</script>
</body>
</html>
"#;

const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Twitter OAuth - Erro na Autorização</title></head>
<body style="font-family: Arial, sans-serif; text-align: center; padding: 40px;">
    <h1 style="color: #dc3545;">❌ Erro na Autorização</h1>
    <p>A autorização foi recusada ou o callback é inválido. Tente novamente.</p>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_process_callback_success() {
        let result = CallbackServer::process_callback(
            &params(&[("oauth_token", "REQ123"), ("oauth_verifier", "VERIFIER")]),
            "REQ123",
        )
        .unwrap();

        assert_eq!(result.oauth_token, "REQ123");
        assert_eq!(result.oauth_verifier, "VERIFIER");
    }

    #[test]
    fn test_process_callback_denied() {
        let result = CallbackServer::process_callback(&params(&[("denied", "REQ123")]), "REQ123");
        assert!(matches!(result, Err(AuthError::AccessDenied)));
    }

    #[test]
    fn test_process_callback_token_mismatch() {
        let result = CallbackServer::process_callback(
            &params(&[("oauth_token", "OTHER"), ("oauth_verifier", "VERIFIER")]),
            "REQ123",
        );
        assert!(matches!(result, Err(AuthError::InvalidState)));

        let result = CallbackServer::process_callback(&params(&[("oauth_verifier", "VERIFIER")]), "REQ123");
        assert!(matches!(result, Err(AuthError::InvalidState)));
    }

    #[test]
    fn test_process_callback_missing_verifier() {
        let result = CallbackServer::process_callback(&params(&[("oauth_token", "REQ123")]), "REQ123");
        assert!(matches!(result, Err(AuthError::InvalidCode(_))));

        let result = CallbackServer::process_callback(
            &params(&[("oauth_token", "REQ123"), ("oauth_verifier", "")]),
            "REQ123",
        );
        assert!(matches!(result, Err(AuthError::InvalidCode(_))));
    }

    #[tokio::test]
    async fn test_server_receives_callback() {
        let (addr, pending) = CallbackServer::new(0, "REQ123".to_string()).start().unwrap();
        assert_ne!(addr.port(), 0);

        let response = reqwest::get(format!(
            "http://{}/callback?oauth_token=REQ123&oauth_verifier=VERIFIER",
            addr
        ))
        .await
        .unwrap();
        assert!(response.status().is_success());
        assert!(response.text().await.unwrap().contains("Autorização Concluída"));

        let result = pending.wait().await.unwrap();
        assert_eq!(
            result,
            CallbackResult {
                oauth_token: "REQ123".to_string(),
                oauth_verifier: "VERIFIER".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_only_exact_callback_path_is_accepted() {
        let (addr, pending) = CallbackServer::new(0, "REQ123".to_string()).start().unwrap();

        let response = reqwest::get(format!(
            "http://{}/callback/extra?oauth_token=REQ123&oauth_verifier=WRONG",
            addr
        ))
        .await
        .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let response = reqwest::get(format!(
            "http://{}/callback?oauth_token=REQ123&oauth_verifier=VERIFIER",
            addr
        ))
        .await
        .unwrap();
        assert!(response.status().is_success());

        let result = pending.wait().await.unwrap();
        assert_eq!(result.oauth_verifier, "VERIFIER");
    }
}
