//! Scope labels.
//!
//! Segment names come from hand-maintained spreadsheets, so matching is done
//! on a normalized form: upper-cased, accents folded, whitespace collapsed.
//! A scope matches a segment when it appears there as a whole word.

/// Normalize a segment or scope label for comparison and display.
pub fn normalize_label(label: &str) -> String {
    let folded: String = label
        .to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `scope` names `segment`. A blank scope matches everything.
pub fn matches_scope(segment: &str, scope: &str) -> bool {
    let needle = normalize_label(scope);
    if needle.is_empty() {
        return true;
    }
    let haystack = normalize_label(segment);

    haystack.match_indices(needle.as_str()).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  zona   Palmíra "), "ZONA PALMIRA");
        assert_eq!(normalize_label("Candelaria-Ñ"), "CANDELARIA-N");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_whole_word_match() {
        assert!(matches_scope("Zona Palmira Norte", "palmira"));
        assert!(matches_scope("RUTA-5", "ruta"));
        assert!(!matches_scope("PALMIRANA", "palmira"));
        assert!(!matches_scope("Z10", "Z1"));
    }

    #[test]
    fn test_blank_scope_matches_all() {
        assert!(matches_scope("anything", "   "));
    }
}
