//! Color and styling helpers for terminal output.
//!
//! Semantic color theme:
//!   - Root package: cyan, bold
//!   - Muted:        dimmed (tree connectors, repeat markers)

use colored::Colorize;

use super::OutputConfig;

/// Style the root package name.
pub(super) fn root(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().bold().to_string()
}

/// Apply "muted" styling (dimmed) to text.
pub(super) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_config_leaves_text_untouched() {
        let config = OutputConfig::plain();
        assert_eq!(root("fastapi", &config), "fastapi");
        assert_eq!(dimmed("├── ", &config), "├── ");
    }

    #[test]
    fn colored_text_keeps_the_original_text() {
        colored::control::set_override(true);
        let config = OutputConfig::new(false, true);
        assert!(root("fastapi", &config).contains("fastapi"));
        assert!(dimmed("(*)", &config).contains("(*)"));
    }
}
