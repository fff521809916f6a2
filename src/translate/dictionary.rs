//! Phrase dictionary fallback for common English/Hindi words, used when
//! the translation endpoint is unreachable.

const HI_TO_EN: &[(&str, &str)] = &[
    ("namaste", "hello"),
    ("kaise ho", "how are you"),
    ("dhanyawad", "thank you"),
    ("haan", "yes"),
    ("nahi", "no"),
    ("kya", "what"),
    ("kahan", "where"),
    ("kab", "when"),
    ("kyun", "why"),
    ("kaun", "who"),
    ("acha", "good"),
    ("accha", "good"),
    ("bura", "bad"),
    ("kharab", "bad"),
    ("bahut", "very"),
    ("thoda", "little"),
    ("zyada", "more"),
    ("kam", "less"),
    ("pani", "water"),
    ("paani", "water"),
    ("doodh", "milk"),
    ("roti", "bread"),
    ("chawal", "rice"),
    ("chai", "tea"),
    ("khana", "food"),
    ("ghar", "home"),
    ("kaam", "work"),
    ("abhi", "now"),
    ("jaldi", "quickly"),
    ("dhire", "slowly"),
    ("yahan", "here"),
    ("wahan", "there"),
];

const EN_TO_HI: &[(&str, &str)] = &[
    ("hello", "namaste"),
    ("hi", "namaste"),
    ("how are you", "kaise ho"),
    ("thank you", "dhanyawad"),
    ("yes", "haan"),
    ("no", "nahi"),
    ("what", "kya"),
    ("where", "kahan"),
    ("when", "kab"),
    ("why", "kyun"),
    ("who", "kaun"),
    ("good", "acha"),
    ("bad", "bura"),
    ("very", "bahut"),
    ("little", "thoda"),
    ("more", "zyada"),
    ("less", "kam"),
    ("water", "pani"),
    ("milk", "doodh"),
    ("bread", "roti"),
    ("rice", "chawal"),
    ("tea", "chai"),
    ("food", "khana"),
    ("home", "ghar"),
    ("work", "kaam"),
];

/// Exact-phrase lookup after lowercasing and trimming. Only the en/hi
/// pair is covered; anything else returns `None`.
pub fn lookup(text: &str, source_lang: &str, target_lang: &str) -> Option<String> {
    let table = match (source_lang, target_lang) {
        ("hi", "en") => HI_TO_EN,
        ("en", "hi") => EN_TO_HI,
        _ => return None,
    };

    let needle = text.trim().to_lowercase();
    table
        .iter()
        .find(|(phrase, _)| *phrase == needle)
        .map(|(_, translation)| translation.to_string())
}
