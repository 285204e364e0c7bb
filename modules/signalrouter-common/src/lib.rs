pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Classify, RouterError};

/// Normalize a raw label into a channel-name segment: lowercase, replace
/// underscores and spaces with hyphens, strip surrounding whitespace.
///
/// Shared by every routing domain so two domains never disagree on how
/// `"Rare Earths"` and `"rare_earths"` both become `"rare-earths"`.
///
/// ```
/// assert_eq!(signalrouter_common::slugify("Rare Earths"), "rare-earths");
/// assert_eq!(signalrouter_common::slugify("violent_crime"), "violent-crime");
/// assert_eq!(signalrouter_common::slugify("  Thunder Bay  "), "thunder-bay");
/// assert_eq!(signalrouter_common::slugify("   "), "");
/// ```
pub fn slugify(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_discards_to_empty_for_blank_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn slugify_collapses_underscores_and_spaces() {
        assert_eq!(slugify("Core Street Crime"), "core-street-crime");
        assert_eq!(slugify("core_street_crime"), "core-street-crime");
    }
}
