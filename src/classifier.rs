//! Heuristic deciding whether a message should be answered by the
//! assistant instead of being relayed to the other participants.

/// Substrings that mark a message as a question. English and Hindi
/// interrogatives, plus the literal question mark.
const QUESTION_KEYWORDS: &[&str] = &[
    "what is",
    "what are",
    "explain",
    "tell me about",
    "how does",
    "why",
    "define",
    "meaning of",
    "help me",
    "can you",
    "please",
    "?",
    "kya hai",
    "batao",
    "samjhao",
    "kaise",
    "kyun",
    "madad karo",
];

/// Returns `true` when the message looks like a question for the
/// assistant. This is a substring heuristic, not a parser; false
/// positives and negatives only affect routing, never correctness.
pub fn is_question(text: &str) -> bool {
    let lowered = text.to_lowercase();
    QUESTION_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_chat_is_not_a_question() {
        assert!(!is_question("hello everyone"));
        assert!(!is_question("good morning"));
        assert!(!is_question("see you tomorrow"));
    }

    #[test]
    fn test_question_mark_is_a_question() {
        assert!(is_question("coming to lunch?"));
    }

    #[test]
    fn test_english_interrogatives() {
        assert!(is_question("what is the capital of France?"));
        assert!(is_question("explain monads"));
        assert!(is_question("tell me about tokio"));
        assert!(is_question("why is the sky blue"));
    }

    #[test]
    fn test_hindi_interrogatives() {
        assert!(is_question("yeh kya hai"));
        assert!(is_question("mujhe batao"));
        assert!(is_question("kaise ho"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(is_question("WHAT IS this"));
        assert!(is_question("Explain yourself"));
    }

    #[test]
    fn test_keyword_inside_a_word_still_matches() {
        // Substring heuristic: "whys" contains "why". Accepted noise.
        assert!(is_question("whys and wherefores"));
    }

    #[test]
    fn test_empty_text_is_not_a_question() {
        assert!(!is_question(""));
    }
}
