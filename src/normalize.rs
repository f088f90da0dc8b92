//! Accent and case normalization for free-text matching.
//!
//! All dataset columns and user input pass through [`normalize`] before any
//! comparison, so athlete, team, and event matching is accent- and
//! case-insensitive. The letter ñ/Ñ is part of the dataset's spelling
//! (athlete and team names) and is preserved rather than folded to `n`.

/// Replace accented vowels with their unaccented equivalents and lower-case
/// the result. ñ/Ñ and all other characters pass through untouched.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            other => other,
        })
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_accents_and_lowercases() {
        assert_eq!(normalize("José Pérez"), "jose perez");
        assert_eq!(normalize("ATLETISMO GALEGO"), "atletismo galego");
        assert_eq!(normalize("Última Marca"), "ultima marca");
    }

    #[test]
    fn test_preserves_enye() {
        assert_eq!(normalize("ñandú"), "ñandu");
        assert_eq!(normalize("Kevin Viñuela"), "kevin viñuela");
        assert_eq!(normalize("AÑO"), "año");
    }

    #[test]
    fn test_idempotent() {
        for input in ["José Pérez", "ñandú", "100 M.L. MASCULINO", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_non_letter_characters_untouched() {
        assert_eq!(normalize("100 M.L."), "100 m.l.");
        assert_eq!(normalize("1:02.30"), "1:02.30");
    }
}
