//! Lexical feature extraction for the local heuristic.

use super::keywords::KeywordSet;

/// Articles shorter than this are penalised as lacking context.
pub const SHORT_TEXT_WORDS: usize = 50;
/// Articles longer than this are rewarded as detailed reporting.
pub const LONG_TEXT_WORDS: usize = 200;
/// More exclamation marks than this counts as emotional tone.
pub const MAX_EXCLAMATIONS: usize = 3;
/// More question marks than this counts as emotional tone.
pub const MAX_QUESTIONS: usize = 5;

/// Signal counts for a single article. Computed fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCounts<'k> {
    pub fake_score: u32,
    pub reliable_score: u32,
    pub word_count: usize,
    pub has_numbers: bool,
    pub exclamation_count: usize,
    pub question_count: usize,
    pub sensational_hits: Vec<&'k str>,
    pub attribution_hits: Vec<&'k str>,
}

impl FeatureCounts<'_> {
    pub fn is_short(&self) -> bool {
        self.word_count < SHORT_TEXT_WORDS
    }

    pub fn is_long(&self) -> bool {
        self.word_count > LONG_TEXT_WORDS
    }

    pub fn is_emotional(&self) -> bool {
        self.exclamation_count > MAX_EXCLAMATIONS || self.question_count > MAX_QUESTIONS
    }
}

/// Headline and body joined by a space, lower-cased.
pub fn full_text(title: &str, description: &str) -> String {
    format!("{title} {description}").to_lowercase()
}

/// Score `text` (expected lower-case, see [`full_text`]) against `keywords`.
pub fn extract<'k>(text: &str, keywords: &'k KeywordSet) -> FeatureCounts<'k> {
    let sensational_hits = keywords.sensational_hits(text);
    let attribution_hits = keywords.attribution_hits(text);

    let mut fake_score = sensational_hits.len() as u32;
    // Attribution counts double.
    let mut reliable_score = 2 * attribution_hits.len() as u32;

    let word_count = text.split_whitespace().count();
    if word_count < SHORT_TEXT_WORDS {
        fake_score += 1;
    } else if word_count > LONG_TEXT_WORDS {
        reliable_score += 1;
    }

    let has_numbers = text.chars().any(|c| c.is_ascii_digit());
    if has_numbers {
        reliable_score += 1;
    }

    let exclamation_count = text.matches('!').count();
    let question_count = text.matches('?').count();

    let mut counts = FeatureCounts {
        fake_score,
        reliable_score,
        word_count,
        has_numbers,
        exclamation_count,
        question_count,
        sensational_hits,
        attribution_hits,
    };
    if counts.is_emotional() {
        counts.fake_score += 2;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn full_text_joins_and_lowercases() {
        assert_eq!(full_text("Big NEWS", "Body Text"), "big news body text");
        assert_eq!(full_text("Шок", "Тайно"), "шок тайно");
    }

    #[test]
    fn empty_text_has_zero_words() {
        let k = KeywordSet::builtin();
        let f = extract("", &k);
        assert_eq!(f.word_count, 0);
        // short-text penalty only
        assert_eq!(f.fake_score, 1);
        assert_eq!(f.reliable_score, 0);
    }

    #[test]
    fn length_bands_are_exclusive() {
        let k = KeywordSet::builtin();
        let at_50 = extract(&words(50), &k);
        assert!(!at_50.is_short());
        assert_eq!((at_50.fake_score, at_50.reliable_score), (0, 0));

        let at_200 = extract(&words(200), &k);
        assert!(!at_200.is_long());
        assert_eq!(at_200.reliable_score, 0);

        let at_201 = extract(&words(201), &k);
        assert_eq!(at_201.reliable_score, 1);
    }

    #[test]
    fn punctuation_thresholds() {
        let k = KeywordSet::builtin();
        let base = words(60);

        let three_bangs = extract(&format!("{base} !!!"), &k);
        assert!(!three_bangs.is_emotional());
        let four_bangs = extract(&format!("{base} !!!!"), &k);
        assert!(four_bangs.is_emotional());
        assert_eq!(four_bangs.fake_score, 2);

        let five_q = extract(&format!("{base} ?????"), &k);
        assert!(!five_q.is_emotional());
        let six_q = extract(&format!("{base} ??????"), &k);
        assert_eq!(six_q.fake_score, 2);
    }

    #[test]
    fn digits_and_attribution_add_reliability() {
        let k = KeywordSet::builtin();
        let text = format!("{} according to researchers 42 cases", words(60));
        let f = extract(&text, &k);
        assert!(f.has_numbers);
        assert_eq!(f.attribution_hits, vec!["according to researchers"]);
        assert_eq!(f.reliable_score, 3);
    }
}
