//! Remote zero-shot classifier.
//!
//! The article is framed as a reliability question and sent to a zero-shot
//! text-classification endpoint with three candidate labels. The winning
//! label (stable argmax over the returned scores) decides the verdict.
//!
//! Transport is behind [`ZeroShotProvider`] so the same mapping runs against
//! the real Hugging Face endpoint, a fixed response, or a failing stub.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{verdict_label, AnalysisRequest, AnalysisResult, AnalyzeError, Analyzer};
use crate::logging::anon_hash;

pub const RELIABLE_LABEL: &str = "reliable news";
pub const CANDIDATE_LABELS: [&str; 3] = [RELIABLE_LABEL, "fake news", "misleading information"];

pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli";

/// First line of the degraded-mode explanation.
pub const UNAVAILABLE_MARKER: &str = "ANALYSIS UNAVAILABLE";

const SUMMARY_CHARS: usize = 100;

/// Failures of the remote path. None of these reach the end user; the
/// orchestration policy turns them into a fallback verdict.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("classification API credential is missing")]
    MissingCredential,
    #[error("classification request timed out")]
    Timeout,
    #[error("classification transport error: {0}")]
    Transport(String),
    #[error("classification service returned HTTP {0}")]
    Status(u16),
    #[error("malformed classification response: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::MissingCredential => "missing_credential",
            RemoteError::Timeout => "timeout",
            RemoteError::Transport(_) => "transport",
            RemoteError::Status(_) => "status",
            RemoteError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
}

/// Parallel label/score arrays, in service order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroShotResponse {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

/// Low-level transport for zero-shot classification.
#[async_trait]
pub trait ZeroShotProvider: Send + Sync {
    async fn classify(&self, inputs: &str, labels: &[&str])
        -> Result<ZeroShotResponse, RemoteError>;
    fn name(&self) -> &'static str;
}

/// Hugging Face Inference API provider.
pub struct HuggingFaceProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HuggingFaceProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fake-news-detector/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ZeroShotProvider for HuggingFaceProvider {
    async fn classify(
        &self,
        inputs: &str,
        labels: &[&str],
    ) -> Result<ZeroShotResponse, RemoteError> {
        if self.api_key.trim().is_empty() {
            return Err(RemoteError::MissingCredential);
        }

        let body = ZeroShotRequest {
            inputs,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}

/// Always answers with the same response. Used by tests and `mock` mode.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    pub response: ZeroShotResponse,
}

impl StaticProvider {
    pub fn new(labels: &[&str], scores: &[f64]) -> Self {
        Self {
            response: ZeroShotResponse {
                labels: labels.iter().map(|s| s.to_string()).collect(),
                scores: scores.to_vec(),
            },
        }
    }
}

#[async_trait]
impl ZeroShotProvider for StaticProvider {
    async fn classify(
        &self,
        _inputs: &str,
        _labels: &[&str],
    ) -> Result<ZeroShotResponse, RemoteError> {
        Ok(self.response.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Always fails with a transport error. Used by tests and `error` mode.
#[derive(Debug, Clone, Default)]
pub struct FailingProvider;

#[async_trait]
impl ZeroShotProvider for FailingProvider {
    async fn classify(
        &self,
        _inputs: &str,
        _labels: &[&str],
    ) -> Result<ZeroShotResponse, RemoteError> {
        Err(RemoteError::Transport("simulated network failure".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[derive(Clone)]
pub struct RemoteClassifier {
    provider: Arc<dyn ZeroShotProvider>,
}

impl RemoteClassifier {
    pub fn new(provider: Arc<dyn ZeroShotProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// One attempt against the provider; no retries.
    pub async fn classify(&self, req: &AnalysisRequest) -> Result<AnalysisResult, RemoteError> {
        let prompt = build_prompt(&req.title, &req.description);
        let started = Instant::now();
        let outcome = self.provider.classify(&prompt, &CANDIDATE_LABELS).await;
        histogram!("remote_classifier_latency_ms", "provider" => self.provider.name())
            .record(started.elapsed().as_secs_f64() * 1000.0);

        let resp = outcome?;
        debug!(
            id = %anon_hash(&req.title),
            provider = self.provider.name(),
            labels = ?resp.labels,
            scores = ?resp.scores,
            "zero-shot response"
        );
        from_response(req, &resp)
    }

    /// "Analysis unavailable" result: random verdict, confidence in 50..80.
    pub fn degraded<R: Rng + ?Sized>(req: &AnalysisRequest, rng: &mut R) -> AnalysisResult {
        let is_real = rng.random_bool(0.5);
        let confidence: u8 = rng.random_range(50..80);
        let analysis = format!(
            "{UNAVAILABLE_MARKER}\n\n\
             We couldn't complete the automatic analysis due to a technical issue.\n\n\
             Here are some tips for manually verifying this news:\n\
             1. Check if the same story appears on multiple reputable news sites\n\
             2. Look for the original source of the information\n\
             3. Verify if the author is credible and real\n\
             4. Check if the website has a history of publishing accurate information\n\
             5. Be skeptical of emotional language and sensational claims\n\
             6. Look for citations and links to primary sources\n\n\
             Headline: \"{}\"\n",
            req.title
        );
        AnalysisResult::new(req, is_real, confidence, analysis)
    }
}

#[async_trait]
impl Analyzer for RemoteClassifier {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError> {
        Ok(self.classify(req).await?)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

pub fn build_prompt(title: &str, description: &str) -> String {
    format!(
        "Headline: {title}\n\nContent: {description}\n\nQuestion: Is this news article reliable and factual?"
    )
}

/// Index of the highest finite score; the first one wins ties.
pub fn stable_argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if !s.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

fn percent(score: f64) -> u8 {
    if score.is_finite() {
        (score * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// Map a service response into the verdict shape.
pub fn from_response(
    req: &AnalysisRequest,
    resp: &ZeroShotResponse,
) -> Result<AnalysisResult, RemoteError> {
    if resp.labels.len() != resp.scores.len() {
        return Err(RemoteError::Malformed(format!(
            "{} labels vs {} scores",
            resp.labels.len(),
            resp.scores.len()
        )));
    }
    let winner = stable_argmax(&resp.scores)
        .ok_or_else(|| RemoteError::Malformed("no usable scores".into()))?;

    let is_real = resp.labels[winner] == RELIABLE_LABEL;
    let confidence = percent(resp.scores[winner]);
    let summary: String = req.description.chars().take(SUMMARY_CHARS).collect();

    let mut out = String::with_capacity(1024);
    let _ = write!(
        out,
        "{} {}%\n\n\
         Analysis:\n\
         This news article was analyzed using natural language processing to detect potential misinformation.\n\n\
         Headline: \"{}\"\n\
         Content summary: The article discusses {}...\n\n\
         Classification results:\n",
        verdict_label(is_real),
        confidence,
        req.title,
        summary
    );
    for (label, score) in resp.labels.iter().zip(&resp.scores) {
        let _ = writeln!(out, "- {}: {}%", label, percent(*score));
    }
    let _ = write!(
        out,
        "\nThis content was determined to be {} with {}% confidence.\n\n{}\n\n\
         Note: This is an algorithmic assessment and should be used alongside other verification methods.\n",
        if is_real {
            "likely reliable"
        } else {
            "potentially unreliable"
        },
        confidence,
        if is_real {
            "The text appears to contain factual information presented in a typical news reporting style."
        } else {
            "The text contains elements that are commonly associated with misleading or fabricated content."
        }
    );

    Ok(AnalysisResult::new(req, is_real, confidence, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn req() -> AnalysisRequest {
        AnalysisRequest::new("Rates unchanged", "The central bank kept rates steady.")
    }

    #[test]
    fn argmax_prefers_first_on_tie() {
        assert_eq!(stable_argmax(&[0.4, 0.4, 0.2]), Some(0));
        assert_eq!(stable_argmax(&[0.1, 0.45, 0.45]), Some(1));
        assert_eq!(stable_argmax(&[0.2, 0.3, 0.5]), Some(2));
    }

    #[test]
    fn argmax_skips_non_finite_and_empty() {
        assert_eq!(stable_argmax(&[]), None);
        assert_eq!(stable_argmax(&[f64::NAN, f64::NAN]), None);
        assert_eq!(stable_argmax(&[f64::NAN, 0.1, 0.05]), Some(1));
    }

    #[test]
    fn fake_label_wins() {
        let resp = ZeroShotResponse {
            labels: vec![
                "fake news".into(),
                "reliable news".into(),
                "misleading information".into(),
            ],
            scores: vec![0.9, 0.05, 0.05],
        };
        let r = from_response(&req(), &resp).unwrap();
        assert!(!r.result);
        assert_eq!(r.confidence_percentage, 90);
        assert!(r.analysis.starts_with("FAKE 90%"));
        assert!(r.analysis.contains("potentially unreliable"));
    }

    #[test]
    fn service_order_is_preserved_in_breakdown() {
        let resp = ZeroShotResponse {
            labels: vec![
                "misleading information".into(),
                "reliable news".into(),
                "fake news".into(),
            ],
            scores: vec![0.2, 0.7, 0.1],
        };
        let r = from_response(&req(), &resp).unwrap();
        assert!(r.result);
        assert_eq!(r.confidence_percentage, 70);
        let lines: Vec<&str> = r.analysis.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(
            lines,
            vec![
                "- misleading information: 20%",
                "- reliable news: 70%",
                "- fake news: 10%"
            ]
        );
    }

    #[test]
    fn summary_is_truncated_to_100_chars() {
        let long = "ж".repeat(150);
        let r = from_response(
            &AnalysisRequest::new("t", long),
            &ZeroShotResponse {
                labels: vec!["reliable news".into()],
                scores: vec![0.6],
            },
        )
        .unwrap();
        let expected = format!("The article discusses {}...", "ж".repeat(100));
        assert!(r.analysis.contains(&expected));
    }

    #[test]
    fn mismatched_or_empty_response_is_malformed() {
        let mismatch = ZeroShotResponse {
            labels: vec!["reliable news".into()],
            scores: vec![0.5, 0.5],
        };
        assert!(matches!(
            from_response(&req(), &mismatch),
            Err(RemoteError::Malformed(_))
        ));
        let empty = ZeroShotResponse {
            labels: vec![],
            scores: vec![],
        };
        assert!(matches!(
            from_response(&req(), &empty),
            Err(RemoteError::Malformed(_))
        ));
    }

    #[test]
    fn prompt_embeds_headline_and_body() {
        let p = build_prompt("H", "B");
        assert_eq!(
            p,
            "Headline: H\n\nContent: B\n\nQuestion: Is this news article reliable and factual?"
        );
    }

    #[test]
    fn degraded_confidence_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let r = RemoteClassifier::degraded(&req(), &mut rng);
            assert!((50..80).contains(&r.confidence_percentage));
            assert!(r.analysis.starts_with(UNAVAILABLE_MARKER));
            assert!(r.analysis.contains("Headline: \"Rates unchanged\""));
        }
    }

    #[tokio::test]
    async fn failing_provider_surfaces_error() {
        let clf = RemoteClassifier::new(Arc::new(FailingProvider));
        let err = clf.classify(&req()).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let p = HuggingFaceProvider::new(
            "http://127.0.0.1:9/never",
            "",
            Duration::from_millis(100),
            Duration::from_millis(200),
        )
        .unwrap();
        let err = p.classify("x", &CANDIDATE_LABELS).await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingCredential));
    }
}
