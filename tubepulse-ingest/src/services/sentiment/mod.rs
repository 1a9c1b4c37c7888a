//! Comment sentiment classification
//!
//! Lexicon-and-rule scoring in the VADER style. Each token's valence is
//! adjusted by the words around it (boosters, negations, capitalisation, a
//! contrastive "but") and by trailing punctuation, then summed and normalised
//! into a compound score in [-1, 1].
//!
//! The label depends on the compound score only:
//! `positive` at or above [`POSITIVE_THRESHOLD`], `negative` at or below
//! [`NEGATIVE_THRESHOLD`], `neutral` otherwise.
//!
//! Classification is pure. The classifier is built once and shared behind an
//! `Arc` by whoever needs it.

mod lexicon;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use lexicon::LEXICON_VERSION;

/// Compound score at or above which a comment is positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which a comment is negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Booster / dampener increment
const B_INCR: f64 = 0.293;
/// ALL-CAPS emphasis increment
const C_INCR: f64 = 0.733;
/// Negation scale
const N_SCALAR: f64 = -0.74;
/// Normalisation constant for the compound score
const ALPHA: f64 = 15.0;
/// Per-'!' emphasis, counted up to four times
const EXCLAMATION_INCR: f64 = 0.292;
/// Per-'?' emphasis when two or three are present
const QUESTION_INCR: f64 = 0.18;
/// Flat '?' emphasis when more than three are present
const QUESTION_MAX: f64 = 0.96;

/// Categorical sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Label for a compound score
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Stored / serialised form
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(SentimentLabel::Positive),
            "neutral" => Some(SentimentLabel::Neutral),
            "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores for one piece of text
///
/// `positive + neutral + negative` is 1 within floating tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    /// Normalised sum of valences, in [-1, 1]
    pub compound: f64,
    pub label: SentimentLabel,
}

impl SentimentScores {
    fn neutral_text() -> Self {
        Self {
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
            compound: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}

/// A whitespace-separated word with surrounding punctuation removed
struct Token<'a> {
    /// Original casing, used for the ALL-CAPS rule
    text: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_upper(&self) -> bool {
        self.text.chars().any(char::is_alphabetic)
            && self
                .text
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(char::is_uppercase)
    }
}

/// Lexicon-based sentiment classifier
pub struct SentimentClassifier {
    lexicon: HashMap<String, f64>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentClassifier {
    /// Classifier over the built-in lexicon
    pub fn new() -> Self {
        Self::with_lexicon(
            lexicon::VALENCES
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence)),
        )
    }

    /// Classifier over a caller-supplied lexicon (words are matched lowercase)
    pub fn with_lexicon(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            lexicon: entries
                .into_iter()
                .map(|(word, valence)| (word.to_lowercase(), valence))
                .collect(),
        }
    }

    /// Score `text`
    pub fn classify(&self, text: &str) -> SentimentScores {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return SentimentScores::neutral_text();
        }

        let upper_count = tokens.iter().filter(|t| t.is_upper()).count();
        let is_cap_diff = upper_count > 0 && upper_count < tokens.len();

        let mut sentiments: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, i, is_cap_diff))
            .collect();

        apply_but_shift(&tokens, &mut sentiments);

        let punct = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += punct;
        } else if sum < 0.0 {
            sum -= punct;
        }
        let compound = normalize(sum);

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for s in &sentiments {
            if *s > 0.0 {
                // +1 offsets the neutral weight every token carries
                pos_sum += s + 1.0;
            } else if *s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1.0;
            }
        }

        if pos_sum > neg_sum.abs() {
            pos_sum += punct;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= punct;
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        if total <= 0.0 {
            return SentimentScores::neutral_text();
        }

        SentimentScores {
            positive: pos_sum / total,
            neutral: neu_count / total,
            negative: neg_sum.abs() / total,
            compound,
            label: SentimentLabel::from_compound(compound),
        }
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        text.split_whitespace()
            .filter_map(|raw| {
                // Emoticons are lexicon entries made of punctuation; keep them whole
                if self.lexicon.contains_key(&raw.to_lowercase()) {
                    return Some(raw);
                }
                let stripped = raw.trim_matches(|c: char| !c.is_alphanumeric());
                (!stripped.is_empty()).then_some(stripped)
            })
            .map(|text| Token {
                text,
                lower: text.to_lowercase(),
            })
            .collect()
    }

    fn token_valence(&self, tokens: &[Token<'_>], i: usize, is_cap_diff: bool) -> f64 {
        let token = &tokens[i];

        if lexicon::booster_scalar(&token.lower).is_some() {
            return 0.0;
        }

        let mut valence = match self.lexicon.get(&token.lower) {
            Some(v) => *v,
            None => return 0.0,
        };

        if is_cap_diff && token.is_upper() {
            valence += C_INCR * valence.signum();
        }

        for distance in 1..=3usize {
            if i < distance {
                break;
            }
            let previous = &tokens[i - distance];
            if self.lexicon.contains_key(&previous.lower) {
                continue;
            }

            let mut scalar = scalar_inc_dec(previous, valence, is_cap_diff);
            if distance == 2 {
                scalar *= 0.95;
            } else if distance == 3 {
                scalar *= 0.9;
            }
            valence += scalar;

            if lexicon::is_negation(&previous.lower) {
                valence *= N_SCALAR;
            }
        }

        valence
    }
}

/// Booster / dampener contribution of `word` towards `valence`
fn scalar_inc_dec(word: &Token<'_>, valence: f64, is_cap_diff: bool) -> f64 {
    let Some(direction) = lexicon::booster_scalar(&word.lower) else {
        return 0.0;
    };

    let mut scalar = direction * B_INCR;
    if valence < 0.0 {
        scalar = -scalar;
    }
    if is_cap_diff && word.is_upper() {
        scalar += C_INCR * valence.signum();
    }
    scalar
}

/// Halve sentiment before the first "but", boost it after
fn apply_but_shift(tokens: &[Token<'_>], sentiments: &mut [f64]) {
    let Some(but_index) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };

    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < but_index {
            *s *= 0.5;
        } else if i > but_index {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64;
    let questions = text.matches('?').count();

    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => QUESTION_MAX,
    };

    exclamations * EXCLAMATION_INCR + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
