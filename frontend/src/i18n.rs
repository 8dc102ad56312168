use crate::state::preferences::Language;

/// Looks `key` up in the catalogue of `language`, falling back to English.
pub fn tr(key: &str, language: Language) -> String {
    rust_i18n::t!(key, locale = language.code()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_catalogues_have_the_sign_in_notice() {
        let en = tr("guard.sign_in_required", Language::En);
        let ar = tr("guard.sign_in_required", Language::Ar);
        assert_eq!(en, "Please sign in to continue");
        assert_ne!(en, ar);
    }

    #[test]
    fn unknown_key_is_echoed() {
        assert!(tr("no.such.key", Language::En).contains("no.such.key"));
    }
}
