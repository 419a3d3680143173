use serde::{Deserialize, Serialize};

/// Identidade do app registrado no Twitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthAppCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub callback_url: String,
}

impl OAuthAppCredentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            callback_url: callback_url.into(),
        }
    }
}

/// Autorização concluída: access token do usuário e seu id
///
/// `screen_name` nunca é preenchido a partir da resposta do access token,
/// mesmo quando o Twitter o envia; fica vazio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthUserGrant {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub user_id: String,
    #[serde(default)]
    pub screen_name: String,
}

impl OAuthUserGrant {
    /// Interpreta o corpo `chave=valor&...` retornado por `oauth/access_token`
    ///
    /// Cada par é quebrado em `=`: o valor é o segundo segmento, então um valor
    /// que contém `=` é truncado ali. Pares sem valor são ignorados e só
    /// `oauth_token`, `oauth_token_secret` e `user_id` são lidos. Retorna
    /// `None` se algum dos três não vier preenchido.
    pub fn from_access_token_response(body: &str) -> Option<Self> {
        let mut oauth_token = None;
        let mut oauth_token_secret = None;
        let mut user_id = None;

        for pair in body.split('&') {
            let mut parts = pair.split('=');
            let key = parts.next().unwrap_or("");
            let value = match parts.next() {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => continue,
            };

            match key {
                "oauth_token" => oauth_token = Some(value),
                "oauth_token_secret" => oauth_token_secret = Some(value),
                "user_id" => user_id = Some(value),
                _ => {}
            }
        }

        Some(Self {
            oauth_token: oauth_token?,
            oauth_token_secret: oauth_token_secret?,
            user_id: user_id?,
            screen_name: String::new(),
        })
    }

    /// Prévia do token para logs e saída da CLI
    pub fn token_preview(&self) -> String {
        preview(&self.oauth_token)
    }
}

pub(crate) fn preview(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}
