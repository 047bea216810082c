//! Fake News Detector server entrypoint.
//! Boots the Axum HTTP server with the credibility service, an in-memory
//! check store and the Prometheus `/metrics` route.

use fake_news_detector::{api, bootstrap::AppRuntime, logging, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;
use tracing::warn;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let runtime = AppRuntime::load()?;

    // CLASSIFIER_PROBE=1: one sample check at startup, logged only.
    if std::env::var("CLASSIFIER_PROBE").is_ok_and(|v| v == "1") {
        runtime.quick_probe().await;
    }

    let mut router = api::router(AppState::new(runtime.service));
    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = %e, "metrics recorder not installed; /metrics disabled"),
    }

    Ok(router.into())
}
