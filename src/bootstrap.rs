// src/bootstrap.rs
//! Assemble the credibility service from configuration.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::analyze::remote::{
    FailingProvider, HuggingFaceProvider, StaticProvider, ZeroShotProvider, CANDIDATE_LABELS,
};
use crate::analyze::{
    AnalysisRequest, CredibilityService, HeuristicClassifier, KeywordSet, RemoteClassifier,
};
use crate::config::classifier::{ClassifierConfig, ENV_TEST_MODE};

pub struct AppRuntime {
    pub cfg: ClassifierConfig,
    pub service: CredibilityService,
}

impl AppRuntime {
    /// Load config from file/env and build the service.
    pub fn load() -> anyhow::Result<Self> {
        let cfg = ClassifierConfig::load()?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: ClassifierConfig) -> anyhow::Result<Self> {
        // Safe diagnostics: never the key itself.
        info!(
            enabled = cfg.enabled,
            endpoint = %cfg.endpoint,
            key_len = cfg.api_key.len(),
            timeout_secs = cfg.timeout_secs,
            fallback = ?cfg.fallback,
            "classifier config loaded"
        );
        let service = build_service(&cfg)?;
        Ok(Self { cfg, service })
    }

    /// One-off check against a fixed sample; logs the outcome, never fails.
    pub async fn quick_probe(&self) {
        let sample = AnalysisRequest::new(
            "Central bank holds interest rates steady",
            "According to data released on Tuesday, inflation slowed to 2.4% in March.",
        );
        let checked = self.service.check_news(&sample).await;
        if checked.fallback {
            warn!(analyzer = checked.analyzer, "classifier probe fell back");
        } else {
            info!(
                analyzer = checked.analyzer,
                confidence = checked.result.confidence_percentage,
                "classifier probe ok"
            );
        }
    }
}

/// Build the service according to config and environment.
///
/// * `enabled == false`: heuristic only, whatever the test mode says.
/// * `CLASSIFIER_TEST_MODE=mock`: remote answers "reliable news" at 0.75.
/// * `CLASSIFIER_TEST_MODE=error`: remote always fails.
/// * otherwise: Hugging Face provider with the configured timeouts.
pub fn build_service(cfg: &ClassifierConfig) -> anyhow::Result<CredibilityService> {
    let keywords = match &cfg.keywords_path {
        Some(p) => KeywordSet::load_from_file(p)?,
        None => KeywordSet::builtin(),
    };
    let heuristic = HeuristicClassifier::new(Arc::new(keywords));
    if !cfg.enabled {
        return Ok(CredibilityService::heuristic_only(heuristic));
    }

    let provider: Arc<dyn ZeroShotProvider> = match std::env::var(ENV_TEST_MODE).as_deref() {
        Ok("mock") => Arc::new(StaticProvider::new(&CANDIDATE_LABELS, &[0.75, 0.15, 0.10])),
        Ok("error") => Arc::new(FailingProvider),
        _ => Arc::new(
            HuggingFaceProvider::new(
                cfg.endpoint.clone(),
                cfg.api_key.clone(),
                cfg.connect_timeout(),
                cfg.timeout(),
            )
            .context("building HTTP client for classification API")?,
        ),
    };

    Ok(CredibilityService::new(
        Arc::new(RemoteClassifier::new(provider)),
        heuristic,
        cfg.fallback,
    ))
}
