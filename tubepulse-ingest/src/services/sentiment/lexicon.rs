//! Built-in valence lexicon
//!
//! Valences are on the usual -4..=4 scale. Changing any entry changes
//! classification output, so bump [`LEXICON_VERSION`] with it.

/// Version tag of the built-in word list
pub const LEXICON_VERSION: &str = "2024.1";

pub(super) const VALENCES: &[(&str, f64)] = &[
    // Emoticons
    (":)", 2.0),
    (":-)", 1.3),
    (":d", 2.3),
    ("<3", 1.9),
    (";)", 0.9),
    (":(", -1.9),
    (":-(", -1.5),
    (":'(", -2.2),
    // Positive
    ("adorable", 2.2),
    ("agree", 1.5),
    ("amazed", 2.2),
    ("amazing", 2.8),
    ("appreciate", 1.7),
    ("appreciated", 2.3),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("beautifully", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("blessed", 2.9),
    ("brilliant", 2.8),
    ("calm", 1.3),
    ("charming", 2.8),
    ("cheer", 2.3),
    ("clean", 1.7),
    ("clever", 2.0),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("cool", 1.3),
    ("creative", 1.9),
    ("cute", 2.0),
    ("delight", 2.9),
    ("delighted", 3.1),
    ("easy", 1.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("entertaining", 2.3),
    ("epic", 2.4),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fabulous", 2.4),
    ("fantastic", 2.6),
    ("favorite", 2.0),
    ("favourite", 2.0),
    ("fine", 0.8),
    ("fun", 2.3),
    ("funny", 1.9),
    ("genius", 1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("grateful", 2.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("haha", 2.0),
    ("hilarious", 1.7),
    ("helpful", 1.8),
    ("hope", 1.9),
    ("impressive", 2.3),
    ("incredible", 2.8),
    ("informative", 1.5),
    ("inspiring", 2.6),
    ("interesting", 1.7),
    ("joy", 2.8),
    ("kind", 2.4),
    ("legend", 1.8),
    ("like", 1.5),
    ("liked", 1.8),
    ("lol", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("loving", 2.9),
    ("masterpiece", 3.1),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("perfectly", 2.9),
    ("pleasant", 2.3),
    ("positive", 2.3),
    ("pretty", 1.6),
    ("proud", 2.1),
    ("recommend", 1.5),
    ("respect", 2.1),
    ("satisfied", 1.8),
    ("smart", 1.7),
    ("solid", 1.2),
    ("special", 1.7),
    ("splendid", 2.8),
    ("stunning", 1.6),
    ("success", 2.7),
    ("superb", 3.1),
    ("support", 1.7),
    ("sweet", 2.0),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("top", 0.8),
    ("useful", 1.9),
    ("valuable", 2.1),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("wow", 2.8),
    ("yay", 2.4),
    ("yes", 1.7),
    // Negative
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("ashamed", -2.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broken", -2.1),
    ("clickbait", -1.5),
    ("confused", -1.3),
    ("confusing", -1.3),
    ("crap", -1.6),
    ("cringe", -1.8),
    ("cry", -2.1),
    ("damn", -1.7),
    ("dead", -3.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disgusting", -2.4),
    ("dislike", -1.6),
    ("dull", -1.7),
    ("dumb", -2.3),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fake", -2.1),
    ("garbage", -2.0),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("idiot", -2.3),
    ("lame", -1.8),
    ("lazy", -1.5),
    ("lie", -1.6),
    ("lies", -1.8),
    ("lost", -1.3),
    ("mad", -2.2),
    ("mess", -1.5),
    ("miss", -0.6),
    ("nasty", -2.6),
    ("negative", -2.7),
    ("pathetic", -2.6),
    ("poor", -2.1),
    ("problem", -1.7),
    ("ridiculous", -1.5),
    ("sad", -2.1),
    ("scam", -2.7),
    ("scared", -1.9),
    ("shame", -2.1),
    ("sick", -2.3),
    ("slow", -0.7),
    ("sorry", -0.3),
    ("stupid", -2.4),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("trash", -2.5),
    ("ugly", -2.3),
    ("unfortunately", -1.4),
    ("unwatchable", -2.3),
    ("upset", -1.6),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("weak", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// Intensity modifiers: +1 boosts, -1 dampens
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 1.0),
    ("amazingly", 1.0),
    ("awfully", 1.0),
    ("completely", 1.0),
    ("deeply", 1.0),
    ("especially", 1.0),
    ("exceptionally", 1.0),
    ("extremely", 1.0),
    ("fully", 1.0),
    ("greatly", 1.0),
    ("highly", 1.0),
    ("hugely", 1.0),
    ("incredibly", 1.0),
    ("insanely", 1.0),
    ("literally", 1.0),
    ("most", 1.0),
    ("particularly", 1.0),
    ("really", 1.0),
    ("remarkably", 1.0),
    ("so", 1.0),
    ("super", 1.0),
    ("thoroughly", 1.0),
    ("totally", 1.0),
    ("truly", 1.0),
    ("unbelievably", 1.0),
    ("utterly", 1.0),
    ("very", 1.0),
    ("almost", -1.0),
    ("barely", -1.0),
    ("hardly", -1.0),
    ("kinda", -1.0),
    ("less", -1.0),
    ("marginally", -1.0),
    ("partly", -1.0),
    ("scarcely", -1.0),
    ("slightly", -1.0),
    ("somewhat", -1.0),
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "neither", "never", "no", "nobody", "none", "nor", "not", "nothing",
    "nowhere", "rarely", "seldom", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

/// Direction of a booster word, if `word` is one
pub(super) fn booster_scalar(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(booster, _)| *booster == word)
        .map(|(_, direction)| *direction)
}

/// Negation words, with or without the apostrophe (`don't` / `dont`, any `n't`)
pub(super) fn is_negation(word: &str) -> bool {
    if word.ends_with("n't") {
        return true;
    }
    NEGATIONS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_forms() {
        assert!(is_negation("not"));
        assert!(is_negation("don't"));
        assert!(is_negation("dont"));
        assert!(is_negation("shouldn't"));
        assert!(!is_negation("note"));
    }

    #[test]
    fn test_modifier_words_carry_no_valence() {
        for (word, _) in BOOSTERS {
            assert!(
                !VALENCES.iter().any(|(w, _)| w == word),
                "{} is both a booster and a lexicon word",
                word
            );
        }
        for word in NEGATIONS {
            assert!(!VALENCES.iter().any(|(w, _)| w == word));
        }
    }

    #[test]
    fn test_valences_in_range() {
        for (word, valence) in VALENCES {
            assert!((-4.0..=4.0).contains(valence), "{} out of range", word);
            assert_eq!(*word, word.to_lowercase());
        }
    }
}
