// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kedai serve`: wires every service and runs the gateway until a shutdown
//! signal arrives.

use std::sync::Arc;

use kedai_agent::{IngestController, install_signal_handler};
use kedai_bus::EventBus;
use kedai_config::KedaiConfig;
use kedai_context::{OrderPipeline, Persona, ProductKnowledge, ReplyGenerator};
use kedai_core::{KedaiError, PluginAdapter, StorageAdapter};
use kedai_gateway::{GatewayState, WebhookSecrets, start_server};
use kedai_gemini::GeminiProvider;
use kedai_router::IntentClassifier;
use kedai_shipping::{QuoteService, RajaOngkirClient};
use kedai_storage::SqliteStore;
use kedai_whatsapp::WhatsAppClient;
use tracing::{error, info, warn};

/// Runs the server. Returns after graceful shutdown.
pub async fn run_serve(config: KedaiConfig) -> Result<(), KedaiError> {
    init_tracing(&config.agent.log_level);

    info!("starting kedai serve");

    let bus = EventBus::default();
    let store = SqliteStore::new(config.storage.clone()).with_events(bus.clone());
    store.initialize().await?;
    let store = Arc::new(store);
    info!(path = %config.storage.database_path, "storage ready");

    let state = build_state(&config, store, bus).await.map_err(|e| {
        error!(error = %e, "failed to initialize services");
        e
    })?;

    let components = state.components.clone();
    let cancel = install_signal_handler();
    let result = start_server(&config.server, state, cancel).await;

    // Storage is registered first, so it closes last.
    for component in components.iter().rev() {
        if let Err(e) = component.shutdown().await {
            warn!(component = component.name(), error = %e, "shutdown failed");
        }
    }

    info!("kedai serve shutdown complete");
    result
}

/// Builds the ingestion pipeline and gateway state.
///
/// Fails when the product knowledge document cannot be read or a required
/// credential is missing.
async fn build_state(
    config: &KedaiConfig,
    store: Arc<SqliteStore>,
    bus: EventBus,
) -> Result<GatewayState, KedaiError> {
    let knowledge = Arc::new(ProductKnowledge::load(&config.agent.product_knowledge_path).await?);

    let provider = Arc::new(GeminiProvider::new(&config.gemini)?);
    let shipping = Arc::new(RajaOngkirClient::new(&config.shipping)?);
    let delivery = Arc::new(WhatsAppClient::new(&config.whatsapp)?);
    let secrets = WebhookSecrets::from_config(&config.whatsapp)?;

    let classifier = IntentClassifier::new(provider.clone(), config.gemini.classifier_model.clone());
    let pipeline = OrderPipeline::new(
        QuoteService::from_config(shipping.clone(), &config.shipping),
        config.shipping.unit_weight_grams,
    );
    let components = vec![
        store.clone() as Arc<dyn PluginAdapter>,
        provider.clone() as Arc<dyn PluginAdapter>,
        shipping.clone() as Arc<dyn PluginAdapter>,
        delivery.clone() as Arc<dyn PluginAdapter>,
    ];

    let replies = ReplyGenerator::new(
        provider,
        store.clone(),
        knowledge,
        Persona::from_config(&config.agent),
        config.gemini.reply_model.clone(),
        config.agent.history_limit,
    );

    let controller = IngestController::new(store, classifier, pipeline, replies, delivery);
    Ok(GatewayState::new(Arc::new(controller), bus, secrets)
        .with_server_config(&config.server)
        .with_components(components))
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kedai={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
