use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use review_relay::config::Config;
use review_relay::consumer::{ConsumerConfig, HttpReviewBackend, run_consumer};
use review_relay::dispatch::{Dispatcher, GitHubNotifier, NoopNotifier, ReviewNotifier};
use review_relay::dispatch::queue::InMemoryQueue;
use review_relay::server::{AppState, build_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "review_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let notifier: Arc<dyn ReviewNotifier> = match &config.github_token {
        Some(token) => match GitHubNotifier::from_token(token.clone()) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                eprintln!("failed to build GitHub client: {e}");
                std::process::exit(1);
            }
        },
        None => Arc::new(NoopNotifier),
    };

    let (queue, source) = InMemoryQueue::channel();
    let backend = Arc::new(HttpReviewBackend::new(
        config.backend_url.clone(),
        config.backend_api_key.clone(),
    ));
    tokio::spawn(run_consumer(
        source,
        backend,
        ConsumerConfig {
            retry_delay: config.retry_delay,
        },
    ));

    let dispatcher = Dispatcher::new(Arc::new(queue), notifier);
    let state = AppState::new(config.webhook_secret.clone(), config.bot_handle.clone(), dispatcher);
    let app = build_router(state);

    tracing::info!("listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
