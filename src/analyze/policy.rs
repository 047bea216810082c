//! Orchestration: try the primary analyzer once, fall back on any failure.
//!
//! `check_news` is total. A remote outage never becomes an error for the
//! caller; it becomes either a heuristic verdict (default) or the
//! "analysis unavailable" degraded verdict, depending on [`FallbackStrategy`].

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{AnalysisRequest, AnalysisResult, DynAnalyzer, HeuristicClassifier, RemoteClassifier};
use crate::logging::anon_hash;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Deterministic local heuristic (reproducible).
    #[default]
    Heuristic,
    /// Random verdict with the "analysis unavailable" template.
    Degraded,
}

impl std::str::FromStr for FallbackStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "local" => Ok(Self::Heuristic),
            "degraded" | "random" => Ok(Self::Degraded),
            other => anyhow::bail!("unknown fallback strategy: {other}"),
        }
    }
}

/// A verdict plus which analyzer produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    pub result: AnalysisResult,
    /// "remote", "heuristic" or "degraded".
    pub analyzer: &'static str,
    pub fallback: bool,
}

#[derive(Clone)]
pub struct CredibilityService {
    primary: Option<DynAnalyzer>,
    heuristic: HeuristicClassifier,
    strategy: FallbackStrategy,
}

impl CredibilityService {
    pub fn new(
        primary: DynAnalyzer,
        heuristic: HeuristicClassifier,
        strategy: FallbackStrategy,
    ) -> Self {
        Self {
            primary: Some(primary),
            heuristic,
            strategy,
        }
    }

    /// No remote analyzer configured: every check is scored locally.
    pub fn heuristic_only(heuristic: HeuristicClassifier) -> Self {
        Self {
            primary: None,
            heuristic,
            strategy: FallbackStrategy::Heuristic,
        }
    }

    pub fn strategy(&self) -> FallbackStrategy {
        self.strategy
    }

    pub fn primary_name(&self) -> Option<&'static str> {
        self.primary.as_ref().map(|p| p.name())
    }

    pub async fn check_news(&self, req: &AnalysisRequest) -> Checked {
        let checked = match &self.primary {
            None => Checked {
                result: self.heuristic.score(req),
                analyzer: "heuristic",
                fallback: false,
            },
            Some(primary) => match primary.analyze(req).await {
                Ok(result) => Checked {
                    result,
                    analyzer: primary.name(),
                    fallback: false,
                },
                Err(e) => {
                    warn!(
                        id = %anon_hash(&req.title),
                        analyzer = primary.name(),
                        kind = e.kind(),
                        error = %e,
                        strategy = ?self.strategy,
                        "primary analyzer failed; falling back"
                    );
                    counter!("remote_classifier_failures_total", "kind" => e.kind())
                        .increment(1);
                    self.fallback(req)
                }
            },
        };

        counter!("news_checks_total", "analyzer" => checked.analyzer).increment(1);
        info!(
            id = %anon_hash(&req.title),
            analyzer = checked.analyzer,
            verdict = checked.result.verdict_label(),
            confidence = checked.result.confidence_percentage,
            "news checked"
        );
        checked
    }

    fn fallback(&self, req: &AnalysisRequest) -> Checked {
        match self.strategy {
            FallbackStrategy::Heuristic => Checked {
                result: self.heuristic.score(req),
                analyzer: "heuristic",
                fallback: true,
            },
            FallbackStrategy::Degraded => Checked {
                result: RemoteClassifier::degraded(req, &mut rand::rng()),
                analyzer: "degraded",
                fallback: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::remote::{FailingProvider, StaticProvider, UNAVAILABLE_MARKER};
    use std::sync::Arc;

    fn remote(p: impl crate::analyze::remote::ZeroShotProvider + 'static) -> DynAnalyzer {
        Arc::new(RemoteClassifier::new(Arc::new(p)))
    }

    fn req() -> AnalysisRequest {
        AnalysisRequest::new("Breaking", "five plain words right here")
    }

    #[tokio::test]
    async fn primary_success_is_returned_unchanged() {
        let svc = CredibilityService::new(
            remote(StaticProvider::new(
                &["reliable news", "fake news", "misleading information"],
                &[0.8, 0.15, 0.05],
            )),
            HeuristicClassifier::default(),
            FallbackStrategy::Heuristic,
        );
        let c = svc.check_news(&req()).await;
        assert_eq!(c.analyzer, "remote");
        assert!(!c.fallback);
        assert!(c.result.result);
        assert_eq!(c.result.confidence_percentage, 80);
    }

    #[tokio::test]
    async fn heuristic_fallback_is_reproducible() {
        let svc = CredibilityService::new(
            remote(FailingProvider),
            HeuristicClassifier::default(),
            FallbackStrategy::Heuristic,
        );
        let a = svc.check_news(&req()).await;
        let b = svc.check_news(&req()).await;
        assert_eq!(a.analyzer, "heuristic");
        assert!(a.fallback);
        assert_eq!(a, b);
        assert_eq!(a.result, HeuristicClassifier::default().score(&req()));
    }

    #[tokio::test]
    async fn degraded_fallback_uses_unavailable_template() {
        let svc = CredibilityService::new(
            remote(FailingProvider),
            HeuristicClassifier::default(),
            FallbackStrategy::Degraded,
        );
        let c = svc.check_news(&req()).await;
        assert_eq!(c.analyzer, "degraded");
        assert!((50..=80).contains(&c.result.confidence_percentage));
        assert!(c.result.analysis.contains(UNAVAILABLE_MARKER));
        assert_eq!(c.result.title, "Breaking");
    }

    #[tokio::test]
    async fn heuristic_only_service() {
        let svc = CredibilityService::heuristic_only(HeuristicClassifier::default());
        assert_eq!(svc.primary_name(), None);
        let c = svc.check_news(&req()).await;
        assert_eq!(c.analyzer, "heuristic");
        assert!(!c.fallback);
    }

    #[test]
    fn strategy_parses_aliases() {
        assert_eq!("Heuristic".parse::<FallbackStrategy>().unwrap(), FallbackStrategy::Heuristic);
        assert_eq!("random".parse::<FallbackStrategy>().unwrap(), FallbackStrategy::Degraded);
        assert!("coinflip".parse::<FallbackStrategy>().is_err());
    }
}
