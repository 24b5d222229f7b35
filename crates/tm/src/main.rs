use clap::{Parser, Subcommand};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tm_ai::HttpGenerator;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tm", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve,
    /// Print the OpenAPI document and exit.
    Openapi,
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only).
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tm=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => {
            tm_serve::openapi::ensure_initialized();

            let db_path = env_or("TASKMATE_DB_PATH", ".taskmate/tasks.db");
            if let Some(parent) = Path::new(&db_path).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let port = std::env::var("TASKMATE_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(3000);
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);

            let generator = HttpGenerator::new(
                env_or("GENERATOR_API_URL", "https://api.openai.com/v1"),
                env_or("GENERATOR_API_KEY", ""),
                env_or("GENERATOR_MODEL", "gpt-4o-mini"),
            );
            let state = tm_serve::AppState {
                db_path,
                generator: Arc::new(generator),
                environment: env_or("TASKMATE_ENV", "development"),
            };

            if let Err(err) = tm_serve::serve(state, addr).await {
                tracing::error!(error = %err, "serve failed");
                std::process::exit(1);
            }
        }
        Command::Openapi => {
            println!("{}", tm_serve::openapi::generate_spec());
        }
    }
}
