use std::{collections::BTreeMap, sync::LazyLock};

/// Token-level canonicalization: abbreviations, misspellings and plural forms
/// of common exercise nouns.
static SYNONYMS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("db", "dumbbell"),
        ("bb", "barbell"),
        ("kb", "kettlebell"),
        ("bw", "bodyweight"),
        ("dumbell", "dumbbell"),
        ("dumbbells", "dumbbell"),
        ("dumbells", "dumbbell"),
        ("barbells", "barbell"),
        ("kettlebells", "kettlebell"),
        ("cables", "cable"),
        ("bands", "band"),
        ("machines", "machine"),
        ("tricep", "triceps"),
        ("bicep", "biceps"),
        ("lat", "lats"),
        ("delt", "delts"),
        ("curls", "curl"),
        ("presses", "press"),
        ("rows", "row"),
        ("squats", "squat"),
        ("deadlifts", "deadlift"),
        ("raises", "raise"),
        ("flye", "fly"),
        ("flyes", "fly"),
        ("flies", "fly"),
        ("flys", "fly"),
        ("extensions", "extension"),
        ("pulldowns", "pulldown"),
        ("pushdowns", "pushdown"),
        ("pullups", "pullup"),
        ("chinups", "chinup"),
        ("pushups", "pushup"),
        ("lunges", "lunge"),
        ("crunches", "crunch"),
        ("shrugs", "shrug"),
        ("dips", "dip"),
        ("planks", "plank"),
        ("kickbacks", "kickback"),
        ("crushers", "crusher"),
        ("thrusters", "thruster"),
        ("swings", "swing"),
        ("ups", "up"),
        ("downs", "down"),
    ])
});

/// Two-word phrases collapsed into a single token, applied after token-level
/// canonicalization so that plural forms have already been reduced.
static PHRASES: [(&str, &str); 9] = [
    ("chin up", "chinup"),
    ("ez bar", "ezbar"),
    ("pull down", "pulldown"),
    ("pull up", "pullup"),
    ("push down", "pushdown"),
    ("push up", "pushup"),
    ("skull crusher", "skullcrusher"),
    ("step up", "stepup"),
    ("trap bar", "trapbar"),
];

/// Filler words which carry no identity: articles, prepositions, "version" and
/// roman numerals.
static FILLERS: [&str; 16] = [
    "a", "an", "the", "of", "with", "on", "in", "at", "to", "for", "from", "and", "version", "ii",
    "iii", "iv",
];

/// Canonicalizes a free-form exercise name.
///
/// Lowercases, strips apostrophes, collapses punctuation into spaces, applies
/// synonym and phrase canonicalization and removes filler words. Total over
/// the string domain: garbage input yields an empty string, never a panic.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace(['\'', '\u{2019}'], "");
    let spaced: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let tokens = spaced
        .split_whitespace()
        .map(|token| SYNONYMS.get(token).copied().unwrap_or(token))
        .collect::<Vec<_>>();

    let mut joined = format!(" {} ", tokens.join(" "));
    for (phrase, replacement) in PHRASES {
        joined = joined.replace(&format!(" {phrase} "), &format!(" {replacement} "));
    }

    joined
        .split_whitespace()
        .filter(|token| !FILLERS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}
