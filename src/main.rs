//! 🛡️ Risk Engine - Real-Time Transaction Scoring Service
//!
//! Scores payment transactions for fraud risk, keeps a bounded history of
//! recent decisions, and tracks precision/recall quality metrics against
//! simulated ground truth until labeled outcomes exist.
//!
//! ## Architecture
//! - HTTP API (axum): scoring, history, analytics, health probes
//! - Scoring Engine: deterministic rule-based risk model
//! - History Store: bounded in-memory ring of recent decisions
//! - Metrics: Prometheus endpoint on /metrics

mod analytics;
mod api;
mod config;
mod context;
mod history;
mod metrics;
mod scoring;
mod types;

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use config::Config;
use context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Initialize metrics
    metrics::init_metrics();
    info!("✅ Metrics: Initialized");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!("✅ Configuration: Loaded");

    print_banner(&config);

    let ctx = Arc::new(AppContext::new(config));
    let app = api::router(ctx.clone());

    let addr = ctx.config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind server address")?;
    info!("🚀 Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn print_banner(config: &Config) {
    println!("\n======================================================================");
    println!("🛡️  RISK ENGINE - TRANSACTION SCORING SERVICE");
    println!("======================================================================");
    println!("⏰ {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("🌍 Environment: {}", config.service.environment);
    println!(
        "🚦 Thresholds: flag ≥ {:.2}, decline ≥ {:.2}",
        config.scoring.flag_threshold, config.scoring.decline_threshold
    );
    println!("🗂️  History capacity: {}", config.history.max_entries);
    println!("📊 Metrics: http://{}/metrics", config.server.bind_address());
    println!("======================================================================\n");
}
