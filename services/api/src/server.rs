use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAffiliateRepository, InMemoryCreditApplicationRepository};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use coop_credit::config::AppConfig;
use coop_credit::error::AppError;
use coop_credit::telemetry;
use coop_credit::workflows::credit::{
    AffiliateService, CreditApi, CreditApplicationService, RiskCentralClient,
};
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let risk_central = Arc::new(RiskCentralClient::from_config(&config.risk_central)?);
    let risk_timeout = config.risk_central.timeout;
    let affiliates = Arc::new(InMemoryAffiliateRepository::default());
    let applications = Arc::new(InMemoryCreditApplicationRepository::default());

    let api = CreditApi {
        affiliates: Arc::new(AffiliateService::new(
            Arc::clone(&affiliates),
            Arc::clone(&risk_central),
            risk_timeout,
        )),
        applications: Arc::new(CreditApplicationService::new(
            affiliates,
            applications,
            Arc::clone(&risk_central),
            risk_timeout,
        )),
    };

    let app = with_operational_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        risk_central = %risk_central.endpoint(),
        "cooperative credit service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
