//! Turkish backend vocabulary and its normalized labels

/// Backend terms and their labels, keyed by [`fold`]ed form.
static VOCABULARY: &[(&str, &str)] = &[
    ("ankaray", "Ankaray"),
    ("metro", "Metro"),
    ("otobüs", "Bus"),
    ("sorgulama başarılı", "Query Successful"),
    ("ilk biniş", "First Entry"),
    ("ikinci kişi", "Second Person"),
    ("aktarma", "Transfer"),
    ("geçersiz kart", "Invalid Card"),
];

/// Label used for bus rides after translation
pub const BUS: &str = "Bus";

/// Case-fold a term for lookup.
///
/// `İ` lowercases to `i` plus U+0307 outside a Turkish locale; the combining
/// dot is dropped so `İlk Biniş` and `İLK BİNİŞ` fold to the same key.
fn fold(term: &str) -> String {
    term.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\u{307}')
        .collect()
}

/// Look up a term case-insensitively
pub fn lookup(term: &str) -> Option<&'static str> {
    let key = fold(term);
    VOCABULARY
        .iter()
        .find(|(source, _)| *source == key)
        .map(|(_, label)| *label)
}

/// Translate a term, passing unknown terms through unchanged
pub fn translate(term: &str) -> String {
    lookup(term).map_or_else(|| term.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Otobüs", "Bus")]
    #[case("OTOBÜS", "Bus")]
    #[case("Metro", "Metro")]
    #[case("ANKARAY", "Ankaray")]
    #[case("Sorgulama Başarılı", "Query Successful")]
    #[case("İLK BİNİŞ", "First Entry")]
    #[case("İlk Biniş", "First Entry")]
    #[case("İKİNCİ KİŞİ", "Second Person")]
    #[case("Aktarma", "Transfer")]
    #[case("Geçersiz Kart", "Invalid Card")]
    fn test_known_terms(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(translate(term), expected);
    }

    #[test]
    fn test_unknown_term_passes_through() {
        assert_eq!(translate("Teleferik"), "Teleferik");
        assert_eq!(lookup("Teleferik"), None);
    }

    #[test]
    fn test_fold_drops_combining_dot() {
        assert_eq!(fold("İKİNCİ KİŞİ"), "ikinci kişi");
        assert_eq!(fold("  Aktarma "), "aktarma");
    }

    #[test]
    fn test_empty_term() {
        assert_eq!(translate(""), "");
    }
}
