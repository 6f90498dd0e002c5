//! # Backend Module
//!
//! Contains all logic of the expense tracker service.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: budget cycles, saldo, spending series, import and export
//! - **Storage**: the CSV-backed transaction table
//! - **IO**: the REST API and the Telegram bot on top of the domain services
//! - **Config** and **Backup**: startup settings and the daily backup loop
//!
//! ## Architecture
//!
//! ```text
//! Telegram webhook / browser
//!     ↓
//! IO Layer (REST handlers, bot replies)
//!     ↓
//! Domain Layer (services, allowance engine)
//!     ↓
//! Storage Layer (CSV file)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with proper CORS configuration
//! - Serve the static web pages next to the API

pub mod backup;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{http::Method, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::backend::config::AppConfig;
use crate::backend::domain::{BudgetSettings, CalendarService, ReportService, TransactionService};
use crate::backend::io::bot::BotService;
use crate::backend::storage::{CsvTransactionStore, TransactionStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService,
    pub report_service: ReportService,
    pub budget_settings: BudgetSettings,
    pub calendar_service: CalendarService,
    pub bot_service: BotService,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Wire every service over one store; the budget handle is shared
    pub fn new(storage: Arc<dyn TransactionStorage>, config: &AppConfig) -> Self {
        let budget_settings = BudgetSettings::new(config.monthly_budget);
        let calendar_service = CalendarService::new(config.timezone);
        let transaction_service = TransactionService::new(storage.clone());
        let report_service = ReportService::new(
            storage,
            budget_settings.clone(),
            config.cycle_day,
            calendar_service,
        );
        let bot_service = BotService::new(
            transaction_service.clone(),
            report_service.clone(),
            budget_settings.clone(),
            calendar_service,
            config.mini_app_url.clone(),
        );

        Self {
            transaction_service,
            report_service,
            budget_settings,
            calendar_service,
            bot_service,
            static_dir: config.static_dir.clone(),
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up transaction store at {}", config.data_path.display());
    let store = CsvTransactionStore::load(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;

    info!("Setting up domain model");
    Ok(AppState::new(Arc::new(store), config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // The mini app is opened from Telegram's domain
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let static_dir = app_state.static_dir.clone();
    let index = ServeFile::new(static_dir.join("index.html"));

    Router::new()
        .route_service("/expenses", index.clone())
        .route_service("/expenses/", index)
        .route_service("/expenses/graph", ServeFile::new(static_dir.join("graph.html")))
        .nest_service("/expenses/static", ServeDir::new(static_dir))
        .nest("/expenses", io::rest::api_router())
        .layer(cors)
        .with_state(app_state)
}
