use std::sync::Arc;

use helpdesk_bot::bot::{ActivitySink, TurnRouter};
use helpdesk_bot::config::Config;
use helpdesk_bot::connector::ConnectorClient;
use helpdesk_bot::kb::QnaMakerClient;
use helpdesk_bot::nlu::LuisClient;
use helpdesk_bot::server::{AppState, message_routes};
use helpdesk_bot::state::MemoryStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("  export LUIS_APP_ID=..., LUIS_ENDPOINT=..., LUIS_ENDPOINT_KEY=...");
            eprintln!("  export QNA_KB_ID=..., QNA_HOST=..., QNA_ENDPOINT_KEY=...");
            std::process::exit(1);
        }
    };

    eprintln!("🤖 Helpdesk Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/api/messages", config.port);
    eprintln!("   LUIS app: {}", config.luis.app_id);
    eprintln!("   QnA KB: {}", config.qna.kb_id);
    eprintln!(
        "   Channel auth: {}",
        if config.credentials.is_some() {
            "app credentials"
        } else {
            "none (emulator mode)"
        }
    );
    eprintln!("   Connect the Bot Framework Emulator to talk to your bot.\n");

    // ── Collaborators ───────────────────────────────────────────────────
    let storage = Arc::new(MemoryStorage::new());
    let recognizer = Arc::new(LuisClient::new(config.luis.clone()));
    let knowledge_base = Arc::new(QnaMakerClient::new(config.qna.clone()));
    let sink: Arc<dyn ActivitySink> = Arc::new(ConnectorClient::new(config.credentials.clone()));

    let router = Arc::new(TurnRouter::new(storage, recognizer, knowledge_base));

    // ── Webhook ─────────────────────────────────────────────────────────
    let app = message_routes(AppState { router, sink });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Webhook listening");
    axum::serve(listener, app).await?;

    Ok(())
}
