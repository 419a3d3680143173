use clap::{Parser, Subcommand};
use serde_json::json;
use twitter_oauth::{EnvManager, LoginFlow, OAuthUserGrant, TwitterOAuthClient};

/// Twitter OAuth CLI - Login OAuth 1.0a de três etapas pela linha de comando
#[derive(Parser)]
#[command(name = "twitter-oauth")]
#[command(version)]
#[command(about = "CLI para o fluxo de login OAuth 1.0a do Twitter", long_about = None)]
struct Cli {
    /// Formato de saída (json, pretty)
    #[arg(short = 'o', long, default_value = "pretty", global = true)]
    output: OutputFormat,

    /// Modo verbose para debug
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Comando a executar
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, PartialEq)]
enum OutputFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(format!("Formato desconhecido: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Obtém um request token temporário
    RequestToken,

    /// Gera a URL de autorização do Twitter
    LoginUrl,

    /// Troca oauth_token + oauth_verifier pelo access token do usuário
    Verify {
        /// oauth_token recebido no callback
        #[arg(short = 't', long)]
        token: String,

        /// oauth_verifier recebido no callback
        #[arg(long)]
        verifier: String,
    },

    /// Obtém o perfil do usuário autenticado
    UserInfo {
        /// Access token do usuário
        #[arg(short = 't', long, env = "TWITTER_ACCESS_TOKEN")]
        token: String,

        /// Access token secret do usuário
        #[arg(short = 's', long, env = "TWITTER_ACCESS_TOKEN_SECRET")]
        token_secret: String,

        /// Id do usuário (opcional, apenas informativo)
        #[arg(long, default_value = "")]
        user_id: String,
    },

    /// Login interativo: abre o navegador e aguarda o callback local
    Login,
}

#[derive(Debug, serde::Serialize)]
struct CliResponse {
    success: bool,
    data: Option<serde_json::Value>,
    error: Option<String>,
}

impl CliResponse {
    fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configura logging
    let default_filter = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = execute_command(&cli).await;

    match result {
        Ok(response) => {
            let exit_code = if response.success { 0 } else { 1 };
            output_response(response, &cli.output);
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("❌ Erro: {}", e);
            std::process::exit(1);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<CliResponse, Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::RequestToken => {
            let env_manager = load_config()?;
            let token = TwitterOAuthClient::new()
                .request_token(&env_manager.credentials())
                .await?;

            Ok(CliResponse::success(json!({ "oauth_token": token })))
        }

        Commands::LoginUrl => {
            let env_manager = load_config()?;
            let url = TwitterOAuthClient::new()
                .login_url(&env_manager.credentials())
                .await?;

            Ok(CliResponse::success(json!({ "login_url": url })))
        }

        Commands::Verify { token, verifier } => {
            let env_manager = load_config()?;
            let grant = TwitterOAuthClient::new()
                .verify_token(token, verifier, &env_manager.consumer_key)
                .await?;

            Ok(match grant {
                Some(grant) => CliResponse::success(json!({
                    "grant": grant,
                    "token_preview": grant.token_preview(),
                })),
                None => CliResponse::error("Twitter não concedeu o access token".to_string()),
            })
        }

        Commands::UserInfo { token, token_secret, user_id } => {
            let env_manager = load_config()?;
            let grant = OAuthUserGrant {
                oauth_token: token.clone(),
                oauth_token_secret: token_secret.clone(),
                user_id: user_id.clone(),
                screen_name: String::new(),
            };

            let profile = TwitterOAuthClient::new()
                .fetch_user_info(&grant, &env_manager.credentials())
                .await?;

            Ok(match profile {
                Some(profile) => CliResponse::success(serde_json::to_value(profile)?),
                None => CliResponse::error("Twitter recusou as credenciais do usuário".to_string()),
            })
        }

        Commands::Login => {
            println!("🔐 Iniciando fluxo de login OAuth 1.0a...");
            println!("📌 Um navegador será aberto para você autorizar o acesso.");

            let outcome = LoginFlow::new()?.run().await?;

            Ok(CliResponse::success(json!({
                "message": "Login concluído com sucesso!",
                "token_preview": outcome.grant.token_preview(),
                "grant": outcome.grant,
                "profile": outcome.profile,
            })))
        }
    }
}

fn load_config() -> Result<EnvManager, Box<dyn std::error::Error>> {
    let env_manager = EnvManager::load()?;
    env_manager.validate()?;
    Ok(env_manager)
}

fn output_response(response: CliResponse, format: &OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(&response) {
            Ok(body) => println!("{}", body),
            Err(e) => eprintln!("❌ Erro ao serializar resposta: {}", e),
        },
        OutputFormat::Pretty => {
            if response.success {
                if let Some(data) = response.data {
                    println!("✅ Sucesso!");
                    println!("{}", serde_json::to_string_pretty(&data).unwrap_or_default());
                }
            } else if let Some(error) = response.error {
                eprintln!("❌ Erro: {}", error);
            }
        }
    }
}
