//! Suggested filename synthesis.

use crate::models::config::ExtractionConfig;

/// Template for `<PREFIX>-<CLIENT>-<BENEFICIARY>-<DATE>.pdf` filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    /// Leading tag.
    pub prefix: String,
    /// Characters of the client name to keep.
    pub client_len: usize,
    /// Characters of the beneficiary name to keep.
    pub beneficiary_len: usize,
}

impl FilenameTemplate {
    pub fn new() -> Self {
        Self {
            prefix: "FC".to_string(),
            client_len: 5,
            beneficiary_len: 10,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            prefix: config.filename_prefix.clone(),
            client_len: config.client_prefix_len,
            beneficiary_len: config.beneficiary_prefix_len,
        }
    }

    /// Render the filename. The date is used verbatim, even when empty.
    pub fn render(&self, client: &str, beneficiary: &str, date: &str) -> String {
        format!(
            "{}-{}-{}-{}.pdf",
            self.prefix,
            abbreviate(client, self.client_len),
            abbreviate(beneficiary, self.beneficiary_len),
            date
        )
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// Spaces removed, first `len` characters, upper-cased.
fn abbreviate(name: &str, len: usize) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .take(len)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let template = FilenameTemplate::new();
        assert_eq!(
            template.render("ACME CORP", "JOHN SMITH LTD", "2024-03-05"),
            "FC-ACMEC-JOHNSMITHL-2024-03-05.pdf"
        );
    }

    #[test]
    fn test_render_short_and_empty_parts() {
        let template = FilenameTemplate::new();
        assert_eq!(template.render("abc", "x y", ""), "FC-ABC-XY-.pdf");
        assert_eq!(template.render("", "", ""), "FC---.pdf");
    }

    #[test]
    fn test_abbreviate_counts_characters() {
        // Spaces are removed before slicing, on characters, not bytes.
        assert_eq!(abbreviate("A B C D E F", 5), "ABCDE");
        assert_eq!(abbreviate("plástico sur", 5), "PLÁST");
    }
}
