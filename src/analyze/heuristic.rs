//! Local, network-free credibility scorer.
//!
//! Reliability is the share of reliable signal in the total signal,
//! clamped to [10, 90]; very short texts are forced to a neutral 50.
//! Confidence is then re-expressed towards whichever verdict won.

use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;

use super::features::{self, FeatureCounts};
use super::{verdict_label, AnalysisRequest, AnalysisResult, AnalyzeError, Analyzer, KeywordSet};

pub const MIN_RELIABILITY: u8 = 10;
pub const MAX_RELIABILITY: u8 = 90;
pub const NEUTRAL_RELIABILITY: u8 = 50;
/// Below this many words the text is too thin to judge.
pub const MIN_JUDGEABLE_WORDS: usize = 15;

#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    keywords: Arc<KeywordSet>,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new(Arc::new(KeywordSet::builtin()))
    }
}

/// Reliability on the credibility scale plus the confidence derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicScore {
    pub reliability: u8,
    pub is_real: bool,
    pub confidence: u8,
}

impl HeuristicScore {
    pub fn from_counts(counts: &FeatureCounts<'_>) -> Self {
        let total = counts.fake_score + counts.reliable_score;
        let mut reliability = if total == 0 {
            NEUTRAL_RELIABILITY
        } else {
            (f64::from(counts.reliable_score) / f64::from(total) * 100.0).round() as u8
        };
        reliability = reliability.clamp(MIN_RELIABILITY, MAX_RELIABILITY);
        if counts.word_count < MIN_JUDGEABLE_WORDS {
            reliability = NEUTRAL_RELIABILITY;
        }

        let is_real = reliability >= NEUTRAL_RELIABILITY;
        let confidence = if is_real { reliability } else { 100 - reliability };
        Self {
            reliability,
            is_real,
            confidence,
        }
    }
}

impl HeuristicClassifier {
    pub fn new(keywords: Arc<KeywordSet>) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Pure and deterministic: same input, same output.
    pub fn score(&self, req: &AnalysisRequest) -> AnalysisResult {
        let text = features::full_text(&req.title, &req.description);
        let counts = features::extract(&text, &self.keywords);
        let score = HeuristicScore::from_counts(&counts);
        let analysis = explain(req, &counts, &score);
        AnalysisResult::new(req, score.is_real, score.confidence, analysis)
    }
}

#[async_trait]
impl Analyzer for HeuristicClassifier {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError> {
        Ok(self.score(req))
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

fn explain(req: &AnalysisRequest, c: &FeatureCounts<'_>, s: &HeuristicScore) -> String {
    let mut out = String::with_capacity(768);
    let _ = write!(
        out,
        "{} {}%\n\n\
         Analysis:\n\
         This article was analyzed with our local algorithm to detect potential signs of fake news.\n\n\
         Title: \"{}\"\n\
         Content summary: The article contains {} words.\n\n",
        verdict_label(s.is_real),
        s.reliability,
        req.title,
        c.word_count
    );

    if c.exclamation_count > features::MAX_EXCLAMATIONS {
        out.push_str("• The text contains multiple exclamation marks, which is common in emotionally charged or sensationalist content.\n");
    }
    if c.has_numbers {
        out.push_str(
            "• The article contains numerical data, which may indicate factual reporting.\n",
        );
    }
    if c.is_short() {
        out.push_str("• The text is relatively short, which may provide insufficient context for a complete story.\n");
    } else if c.is_long() {
        out.push_str("• The article is detailed, which is common in thorough reporting.\n");
    }
    if !c.attribution_hits.is_empty() {
        out.push_str("• The article references sources or experts, which is typical of fact-based reporting.\n");
    }
    if !c.sensational_hits.is_empty() {
        out.push_str("• The article contains potentially sensationalist language.\n");
    }

    let _ = write!(
        out,
        "\nCredibility score: {}%\n\
         \nNote: This is a simple algorithmic assessment and should be used alongside other verification methods.",
        s.reliability
    );
    out
}
