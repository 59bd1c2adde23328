//! Text normalization for free-text queries and institution names

/// Generic institution words stripped before comparing hospital names.
/// Longer entries come first so their parts don't split them.
const INSTITUTION_STOPLIST: &[&str] = &[
    "super specialty",
    "hospitals",
    "hospital",
    "center",
    "clinic",
    "medical",
];

/// Lower-case, unify apostrophes, collapse whitespace runs and trim.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text with the generic institution words removed.
///
/// Word boundaries are kept, so "Kovai Medical College Hospital" becomes
/// `kovai college`. Used to fuzzy-match hospital names inside free text.
pub fn institution_phrase(text: &str) -> String {
    let mut lowered = normalize(text);
    for word in INSTITUTION_STOPLIST {
        lowered = lowered.replace(word, " ");
    }
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `word` is, or opens, one of the generic institution words
pub fn is_institution_word(word: &str) -> bool {
    INSTITUTION_STOPLIST
        .iter()
        .any(|entry| entry.split(' ').next() == Some(word))
}

/// Build the key used to compare two institution names for equality.
///
/// Lower-cases, removes the generic institution words and then drops all
/// whitespace, so "Coimbatore Medical Center" and "coimbatore center" share
/// the key `coimbatore`. The key is never shown to users.
pub fn normalize_institution_name(text: &str) -> String {
    institution_phrase(text).split_whitespace().collect()
}

/// `normalize` for optional input; absent text becomes an empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// `normalize_institution_name` for optional input.
pub fn institution_key_opt(text: Option<&str>) -> String {
    text.map(normalize_institution_name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institution_words_include_multi_word_openers() {
        assert!(is_institution_word("hospitals"));
        assert!(is_institution_word("super"));
        assert!(!is_institution_word("specialty"));
        assert!(!is_institution_word("kg"));
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  I have   Chest\tPain \n"), "i have chest pain");
        assert_eq!(normalize("Doctor\u{2019}s list"), "doctor's list");
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize_institution_name(""), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(institution_key_opt(None), "");
    }

    #[test]
    fn institution_keys_ignore_generic_words() {
        assert_eq!(
            normalize_institution_name("Coimbatore Medical Center"),
            normalize_institution_name("coimbatore center")
        );
        assert_eq!(normalize_institution_name("Ganga Hospital"), "ganga");
        assert_eq!(normalize_institution_name("Royal Care Super Specialty"), "royalcare");
        assert_eq!(normalize_institution_name("Sri Ramakrishna Hospital"), "sriramakrishna");
        assert_eq!(normalize_institution_name("PSG Hospitals"), "psg");
    }

    #[test]
    fn institution_phrase_keeps_word_boundaries() {
        assert_eq!(institution_phrase("Kovai Medical College Hospital"), "kovai college");
        assert_eq!(
            institution_phrase("I have chest pain at Ganga Hospital"),
            "i have chest pain at ganga"
        );
        assert_eq!(institution_phrase("Royal Care Super Specialty"), "royal care");
    }

    #[test]
    fn institution_key_is_idempotent() {
        let once = normalize_institution_name("Hope Medical Center");
        assert_eq!(normalize_institution_name(&once), once);
    }
}
