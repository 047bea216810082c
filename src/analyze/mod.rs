// src/analyze/mod.rs
//! Credibility-scoring engine: two interchangeable analyzers behind one
//! [`Analyzer`] trait, plus the policy that picks between them.
//!
//! - [`remote::RemoteClassifier`]: zero-shot classification over HTTP.
//! - [`heuristic::HeuristicClassifier`]: deterministic keyword scorer, no I/O.
//! - [`policy::CredibilityService`]: tries the primary, falls back on failure.

pub mod features;
pub mod heuristic;
pub mod keywords;
pub mod policy;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use heuristic::HeuristicClassifier;
pub use keywords::KeywordSet;
pub use policy::{Checked, CredibilityService, FallbackStrategy};
pub use remote::{RemoteClassifier, RemoteError};

/// One article to check. Both fields are expected non-empty; validation is
/// the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub description: String,
}

impl AnalysisRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Verdict produced by either analyzer. Immutable once built.
///
/// `confidence_percentage` is confidence in whichever verdict `result` holds:
/// for a FAKE verdict it is confidence in fakeness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub result: bool,
    pub confidence_percentage: u8,
    pub analysis: String,
    pub title: String,
    pub description: String,
}

impl AnalysisResult {
    pub fn new(
        req: &AnalysisRequest,
        result: bool,
        confidence_percentage: u8,
        analysis: impl Into<String>,
    ) -> Self {
        Self {
            result,
            confidence_percentage: confidence_percentage.min(100),
            analysis: analysis.into(),
            title: req.title.clone(),
            description: req.description.clone(),
        }
    }

    /// "REAL" / "FAKE" label used in explanations and logs.
    pub fn verdict_label(&self) -> &'static str {
        verdict_label(self.result)
    }
}

pub(crate) fn verdict_label(is_real: bool) -> &'static str {
    if is_real {
        "REAL"
    } else {
        "FAKE"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl AnalyzeError {
    /// Short label for metrics/log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Remote(e) => e.kind(),
        }
    }
}

/// Shared capability of both analyzers.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError>;
    /// Analyzer name for diagnostics/headers.
    fn name(&self) -> &'static str;
}

pub type DynAnalyzer = Arc<dyn Analyzer>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_serializes_in_camel_case() {
        let req = AnalysisRequest::new("T", "D");
        let r = AnalysisResult::new(&req, false, 73, "FAKE 27%");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            json!({
                "result": false,
                "confidencePercentage": 73,
                "analysis": "FAKE 27%",
                "title": "T",
                "description": "D"
            })
        );
    }

    #[test]
    fn confidence_is_capped_at_100() {
        let req = AnalysisRequest::new("T", "D");
        let r = AnalysisResult::new(&req, true, 250, "");
        assert_eq!(r.confidence_percentage, 100);
        assert_eq!(r.verdict_label(), "REAL");
    }
}
