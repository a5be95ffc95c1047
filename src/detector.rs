//! Heuristic language detection for short user utterances.
//!
//! Two signals are scored per locale: characters unique to its alphabet and
//! marker words (greetings, thanks, lesson vocabulary). The first locale with
//! any signal wins, checked in the order Lithuanian, Russian, English.
//! Lithuanian is checked first on purpose so that mixed Lithuanian/Russian
//! text resolves to Lithuanian.

use crate::locale::Locale;

const LITHUANIAN_CHARS: &[char] = &['ą', 'č', 'ę', 'ė', 'į', 'š', 'ų', 'ū', 'ž'];

const LITHUANIAN_MARKERS: &[&str] = &[
    "labas",
    "sveiki",
    "laba diena",
    "ačiū",
    "aciu",
    "dėkoju",
    "dekoju",
    "prašau",
    "prasau",
    "kaip sekasi",
    "dirbtinis",
    "dirbtinio",
    "dirbtinį",
    "intelektas",
    "intelekto",
    "intelektą",
    "kas yra",
];

const RUSSIAN_MARKERS: &[&str] = &[
    "привет",
    "здравствуйте",
    "добрый день",
    "спасибо",
    "пожалуйста",
    "как дела",
    "искусственный",
    "интеллект",
    "что такое",
];

const ENGLISH_MARKERS: &[&str] = &[
    "hello",
    "hi ",
    "good morning",
    "thank you",
    "thanks",
    "please",
    "artificial",
    "intelligence",
    "what is",
];

/// Lower-cases `text`, drops punctuation and symbols, and collapses
/// whitespace runs into single spaces.
///
/// Letters from the Cyrillic block (U+0400..=U+04FF) and Latin Extended-A
/// (U+0100..=U+017F) always survive, so Russian and Lithuanian letters are
/// never stripped.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|&c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || ('\u{0400}'..='\u{04FF}').contains(&c)
                || ('\u{0100}'..='\u{017F}').contains(&c)
        })
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_russian_letter(c: char) -> bool {
    ('а'..='я').contains(&c) || c == 'ё'
}

fn has_marker(normalized: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| normalized.contains(marker))
}

/// Classifies `text` into one of the supported locales.
///
/// Empty or unclassifiable input yields [`Locale::English`].
pub fn detect(text: &str) -> Locale {
    if text.trim().is_empty() {
        return Locale::English;
    }

    let normalized = normalize(text);
    // Trailing space lets word-final markers such as "hi " match at the end.
    let padded = format!("{} ", normalized);

    let lithuanian_chars = normalized
        .chars()
        .filter(|c| LITHUANIAN_CHARS.contains(c))
        .count();
    if lithuanian_chars > 0 || has_marker(&padded, LITHUANIAN_MARKERS) {
        return Locale::Lithuanian;
    }

    let russian_chars = normalized.chars().filter(|&c| is_russian_letter(c)).count();
    if russian_chars > 0 || has_marker(&padded, RUSSIAN_MARKERS) {
        return Locale::Russian;
    }

    if has_marker(&padded, ENGLISH_MARKERS) {
        return Locale::English;
    }

    Locale::English
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("  Labas,   kaip\tsekasi?! "), "labas kaip sekasi");
        assert_eq!(normalize("Привет, что такое ИИ?"), "привет что такое ии");
        assert_eq!(normalize("Ačiū — ŽINAU!"), "ačiū žinau");
    }

    #[test]
    fn test_normalize_is_pure() {
        let input = "Hello, WHAT is AI???";
        assert_eq!(normalize(input), normalize(input));
        assert_eq!(normalize(&normalize(input)), normalize(input));
    }

    #[test]
    fn test_empty_input_defaults_to_english() {
        assert_eq!(detect(""), Locale::English);
        assert_eq!(detect("   \n\t"), Locale::English);
        assert_eq!(detect("?!..."), Locale::English);
    }

    #[test]
    fn test_lithuanian_diacritics_only() {
        for c in LITHUANIAN_CHARS {
            assert_eq!(detect(&c.to_string()), Locale::Lithuanian, "char {}", c);
        }
        assert_eq!(detect("ąčęėįšųūž"), Locale::Lithuanian);
        assert_eq!(detect("ŠŽŪ"), Locale::Lithuanian);
    }

    #[test]
    fn test_lithuanian_marker_without_diacritics() {
        assert_eq!(detect("Labas, kaip sekasi?"), Locale::Lithuanian);
        assert_eq!(detect("sveiki"), Locale::Lithuanian);
    }

    #[test]
    fn test_russian_alphabet_only() {
        assert_eq!(detect("абвгдеёжзийклмнопрстуфхцчшщъыьэюя"), Locale::Russian);
        assert_eq!(detect("Привет, что такое ИИ?"), Locale::Russian);
        assert_eq!(detect("ЁЖ"), Locale::Russian);
    }

    #[test]
    fn test_english_without_signals() {
        assert_eq!(detect("Hello, what is AI?"), Locale::English);
        assert_eq!(detect("random words 123"), Locale::English);
        assert_eq!(detect("Bonjour tout le monde"), Locale::English);
    }

    #[test]
    fn test_english_marker_at_end_of_text() {
        assert_eq!(detect("oh hi"), Locale::English);
    }

    #[test]
    fn test_lithuanian_wins_over_russian() {
        assert_eq!(detect("labas привет"), Locale::Lithuanian);
        assert_eq!(detect("спасибо, ačiū"), Locale::Lithuanian);
    }

    #[test]
    fn test_detect_is_idempotent() {
        for input in ["Labas, kaip sekasi?", "Привет", "Hello", ""] {
            assert_eq!(detect(input), detect(input));
        }
    }

    #[test]
    fn test_english_text_does_not_trip_lithuanian_markers() {
        assert_eq!(detect("Tell me about artificial intelligence"), Locale::English);
    }
}
