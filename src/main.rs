//!
//! Self-storage booking server: facility directory, reservation wizard
//! commits, extensions and expiry notifications over a REST API.
//! Reads configuration from TOML file (~/.config/storapedia/config.toml).

use std::sync::Arc;
use std::time::Duration;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use storapedia::application::booking::BookingService;
use storapedia::application::identity::IdentityService;
use storapedia::application::services::{DashboardService, InvoiceService, LocationDirectory};
use storapedia::config::AppConfig;
use storapedia::domain::location::{GeoPoint, Location, LocationRepository};
use storapedia::domain::pricing::PricingTable;
use storapedia::domain::RepositoryProvider;
use storapedia::infrastructure::database::migrator::Migrator;
use storapedia::infrastructure::payment::SimulatedPaymentGateway;
use storapedia::interfaces::http::modules::health;
use storapedia::support::shutdown::ShutdownCoordinator;
use storapedia::{
    create_api_router, create_event_bus, default_config_path, init_database, AppState,
    DatabaseConfig, SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("STORAPEDIA_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Storapedia Booking Service...");

    // ── Prometheus metrics exporter (must be installed before any metrics calls) ──
    let metrics_addr: std::net::SocketAddr =
        ([0, 0, 0, 0], app_cfg.server.metrics_port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .expect("Failed to install Prometheus metrics exporter");
    info!("📊 Prometheus metrics exposed on http://{}/metrics", metrics_addr);

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Seed the facility directory on first run
    seed_default_locations(repos.locations()).await;

    // ── Services ───────────────────────────────────────────────
    let pricing = PricingTable::from(&app_cfg.pricing);
    let event_bus = create_event_bus();
    info!("🔔 Event bus initialized for dashboard notifications");

    let identity = Arc::new(IdentityService::new(repos.users()));
    let payment = Arc::new(SimulatedPaymentGateway::new(Duration::from_millis(
        app_cfg.payment.gateway_delay_ms,
    )));
    let bookings = Arc::new(
        BookingService::new(
            repos.clone(),
            identity.clone(),
            payment,
            pricing.clone(),
            event_bus.clone(),
        )
        .with_network_timeout(Duration::from_secs(app_cfg.payment.network_timeout_secs)),
    );
    let directory = Arc::new(LocationDirectory::new(repos.locations()));
    let dashboard = Arc::new(DashboardService::new(repos.bookings(), event_bus.clone()));
    let invoices = Arc::new(InvoiceService::new(repos.bookings(), repos.users()));

    let state = AppState {
        repos,
        bookings,
        identity,
        directory,
        dashboard,
        invoices,
        pricing,
        events: event_bus,
    };

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(state);
    health::mark_started();

    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("👋 Storapedia Booking Service shutdown complete");
    Ok(())
}

/// Seed a starter set of facilities when the directory is empty.
async fn seed_default_locations(locations: Arc<dyn LocationRepository>) {
    let existing = match locations.find_all().await {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to inspect facility directory: {}", e);
            return;
        }
    };
    if !existing.is_empty() {
        return;
    }

    info!("Seeding default storage locations...");
    let defaults = vec![
        Location {
            id: "loc-kuta".to_string(),
            name: "Kuta Storage Hub".to_string(),
            address: "Jl. Raya Kuta No. 88, Kuta".to_string(),
            geolocation: GeoPoint {
                latitude: -8.7237,
                longitude: 115.1750,
            },
            capacity: 40,
            features: vec![
                "24/7 access".to_string(),
                "CCTV".to_string(),
                "Climate control".to_string(),
            ],
            image_url: None,
        },
        Location {
            id: "loc-denpasar".to_string(),
            name: "Denpasar Central Storage".to_string(),
            address: "Jl. Gatot Subroto No. 12, Denpasar".to_string(),
            geolocation: GeoPoint {
                latitude: -8.6705,
                longitude: 115.2126,
            },
            capacity: 60,
            features: vec!["24/7 access".to_string(), "Drive-up units".to_string()],
            image_url: None,
        },
        Location {
            id: "loc-ubud".to_string(),
            name: "Ubud Valley Storage".to_string(),
            address: "Jl. Raya Ubud No. 5, Ubud".to_string(),
            geolocation: GeoPoint {
                latitude: -8.5069,
                longitude: 115.2625,
            },
            capacity: 25,
            features: vec!["CCTV".to_string(), "Packing supplies".to_string()],
            image_url: None,
        },
    ];

    for location in defaults {
        let id = location.id.clone();
        if let Err(e) = locations.save(location).await {
            error!("Failed to seed location {}: {}", id, e);
        }
    }
    info!("Default storage locations seeded");
}
