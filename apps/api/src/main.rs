mod claims;
mod config;
mod db;
mod enrichment;
mod errors;
mod evidence;
mod intake;
mod llm_client;
mod notify;
mod policy;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::claims::store::{PgAuditLog, PgClaimStore};
use crate::config::Config;
use crate::db::create_pool;
use crate::enrichment::analysis::DocumentIntelligenceClient;
use crate::enrichment::vision::AzureVisionClient;
use crate::evidence::S3EvidenceStore;
use crate::llm_client::{LlmClient, LlmSummarizer};
use crate::notify::WebhookNotifier;
use crate::policy::PgPolicyStore;
use crate::routes::build_router;
use crate::state::{AppState, IntakeContext};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Claim Intake API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (policy lookups, audit trail, claim documents)
    let pool = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO evidence storage
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client for narrative summarization
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Wire every external collaborator into the intake context.
    let ctx = Arc::new(IntakeContext {
        policies: Arc::new(PgPolicyStore::new(pool.clone())),
        evidence: Arc::new(S3EvidenceStore::new(s3, config.s3_bucket.clone())),
        vision: Arc::new(AzureVisionClient::new(
            config.vision_endpoint.clone(),
            config.vision_key.clone(),
        )),
        analysis: Arc::new(DocumentIntelligenceClient::new(
            config.doc_analysis_endpoint.clone(),
            config.doc_analysis_key.clone(),
        )),
        summarizer: Arc::new(LlmSummarizer::new(llm)),
        claims: Arc::new(PgClaimStore::new(pool.clone())),
        audit: Arc::new(PgAuditLog::new(pool)),
        notifier: Arc::new(WebhookNotifier::new(config.webhook_url.clone())),
    });

    let state = AppState { ctx };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "claim-intake-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
