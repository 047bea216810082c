//! Keyword data for the local heuristic.
//!
//! Two lists drive the scorer: sensational/conspiratorial wording (counts
//! against credibility) and attribution phrases (counts for it). The built-in
//! lists cover English, Russian and Ukrainian. A custom set can be loaded from
//! TOML:
//!
//! ```toml
//! sensational = ["shocking", "they don't want you to know"]
//! attribution = ["according to researchers"]
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const BUILTIN_SENSATIONAL: &[&str] = &[
    // ru
    "шокирующий",
    "шок",
    "сенсация",
    "сенсационный",
    "невероятный",
    "правительство скрывает",
    "они не хотят чтобы вы знали",
    "тайно",
    "раскрыто",
    "теория заговора",
    "заговор",
    "все врут",
    "врачи скрывают",
    "не рассказывают",
    "запрещенный",
    "молчат",
    "вас обманывают",
    // en
    "exclusive",
    "shocking",
    "shock",
    "sensational",
    "incredible",
    "government hides",
    "they don't want you to know",
    "secretly",
    "revealed",
    "conspiracy theory",
    "conspiracy",
    "everyone is lying",
    "doctors are hiding",
    "not telling",
    "banned",
    "silent",
    "deceiving you",
    // uk
    "шокуюча",
    "сенсація",
    "неймовірний",
    "уряд приховує",
    "вони не хочуть",
    "таємно",
    "розкрито",
    "теорія змови",
    "змова",
    "всі брешуть",
    "обманюють",
];

const BUILTIN_ATTRIBUTION: &[&str] = &[
    // ru
    "по словам исследователей",
    "ученые утверждают",
    "согласно исследованию",
    "исследование опубликовано в",
    "по данным",
    "согласно статистике",
    "эксперты считают",
    "как утверждают специалисты",
    "согласно опросу",
    // en
    "according to researchers",
    "scientists say",
    "according to a study",
    "research published in",
    "according to data",
    "according to statistics",
    "experts say",
    "specialists claim",
    "according to a survey",
    // uk
    "за словами дослідників",
    "вчені стверджують",
    "згідно з дослідженням",
    "дослідження опубліковано в",
    "за даними",
    "згідно зі статистикою",
];

/// Read-only keyword lists injected into the heuristic scorer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordSet {
    #[serde(default)]
    pub sensational: Vec<String>,
    #[serde(default)]
    pub attribution: Vec<String>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordSet {
    /// The built-in multilingual lists.
    pub fn builtin() -> Self {
        Self {
            sensational: BUILTIN_SENSATIONAL.iter().map(|s| s.to_string()).collect(),
            attribution: BUILTIN_ATTRIBUTION.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let raw: KeywordSet = toml::from_str(s).context("parsing keyword set")?;
        Ok(Self {
            sensational: clean(raw.sensational),
            attribution: clean(raw.attribution),
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading keyword set from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Sensational entries that occur in `text` (already lower-cased).
    pub fn sensational_hits<'a>(&'a self, text: &str) -> Vec<&'a str> {
        hits(&self.sensational, text)
    }

    /// Attribution entries that occur in `text` (already lower-cased).
    pub fn attribution_hits<'a>(&'a self, text: &str) -> Vec<&'a str> {
        hits(&self.attribution, text)
    }
}

fn hits<'a>(list: &'a [String], text: &str) -> Vec<&'a str> {
    list.iter()
        .map(String::as_str)
        .filter(|k| text.contains(k))
        .collect()
}

// Lower-case, trim, drop empties and duplicates (first occurrence wins).
fn clean(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
