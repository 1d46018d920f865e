use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadRepository};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_ai::config::AppConfig;
use lead_ai::error::AppError;
use lead_ai::leads::LeadService;
use lead_ai::scoring::LeadScoringService;
use lead_ai::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let scorer = Arc::new(LeadScoringService::from_path(&config.scoring.training_data));
    let repository = Arc::new(InMemoryLeadRepository::default());
    let lead_service = Arc::new(LeadService::new(repository, scorer.clone()));

    let app = with_lead_routes(lead_service, scorer.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model_trained = scorer.is_model_trained(),
        "lead intelligence service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
