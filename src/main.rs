use anyhow::{Context, Result};
use chrono::Utc;
use dotenvy::dotenv;
use tracing::{error, info};

use ride_dashboard::config::DashboardConfig;
use ride_dashboard::dto::DashboardRequest;
use ride_dashboard::services::DashboardService;

fn log_level() -> tracing::Level {
    std::env::var("RUST_LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(tracing::Level::INFO)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Logs a stderr, stdout queda para el JSON
    tracing_subscriber::fmt()
        .with_max_level(log_level())
        .with_writer(std::io::stderr)
        .init();

    info!("🚗 Ride Dashboard - analítica y timeline");

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(e.into());
        }
    };

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DASHBOARD_SNAPSHOT").ok())
        .context("uso: ride-dashboard <snapshot.json> (o DASHBOARD_SNAPSHOT)")?;

    let request = DashboardRequest::from_path(&path)
        .await
        .with_context(|| format!("no se pudo cargar {}", path))?;

    let violations = request.snapshot.report_data_quality();
    if violations > 0 {
        info!("⚠️ {} registros con datos inconsistentes", violations);
    }

    let filters = request.filters.to_filter_set()?;
    let service = DashboardService::new(config)?;
    let view = service.build(&request.snapshot, &filters, request.filters.time_range, Utc::now());

    info!(
        "✅ Vista calculada: {} reservas, ingresos {}",
        view.summary.booking_count, view.summary.total_revenue
    );

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
