//! Fixed parts of the generated module: header comment, section banners and
//! the settings block.

use crate::config::GenerateConfig;
use crate::ir::quote_single;

/// The `AUTO-GENERATED` header comment with the optional app name, version
/// and free comment.
pub fn header_comment(config: &GenerateConfig) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(app_name) = config.app_name.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("App Name: {}", app_name));
    }
    if let Some(version) = config.version.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("Version: {}", version));
    }
    if let Some(comment) = config.comment.as_deref().filter(|s| !s.is_empty()) {
        parts.extend(comment.lines().map(str::to_string));
    }

    let mut output = String::from("/**\n * AUTO-GENERATED FILE. DO NOT MODIFY.\n");
    if !parts.is_empty() {
        output.push_str(" *\n");
        for part in &parts {
            output.push_str(&format!(" * {}\n", part));
        }
    }
    output.push_str(" */");
    output
}

/// A named section introduced by its banner line.
pub fn section(name: &str, body: &str) -> String {
    format!("// ------------------ {} ------------------\n\n{}\n", name, body.trim_end())
}

/// `const baseUrl = '...';` with one trailing slash removed.
pub fn settings(base_url: &str) -> String {
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("const baseUrl = {};", quote_single(base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_without_parts() {
        let config = GenerateConfig::new("models.ts");
        assert_eq!(header_comment(&config), "/**\n * AUTO-GENERATED FILE. DO NOT MODIFY.\n */");
    }

    #[test]
    fn test_header_with_parts() {
        let mut config = GenerateConfig::new("models.ts");
        config.app_name = Some("cars".to_string());
        config.version = Some("1.0.0".to_string());
        config.comment = Some("Internal use only".to_string());

        assert_eq!(
            header_comment(&config),
            "/**\n * AUTO-GENERATED FILE. DO NOT MODIFY.\n *\n * App Name: cars\n * Version: 1.0.0\n * Internal use only\n */"
        );
    }

    #[test]
    fn test_section_banner() {
        assert_eq!(
            section("Settings", "const baseUrl = '';\n\n"),
            "// ------------------ Settings ------------------\n\nconst baseUrl = '';\n"
        );
    }

    #[test]
    fn test_settings_strips_trailing_slash() {
        assert_eq!(settings("https://api.example.com/"), "const baseUrl = 'https://api.example.com';");
        assert_eq!(settings("http://localhost:3000"), "const baseUrl = 'http://localhost:3000';");
        assert_eq!(settings(""), "const baseUrl = '';");
        assert_eq!(settings("http://a/it's"), "const baseUrl = 'http://a/it\\'s';");
    }
}
