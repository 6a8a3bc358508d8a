//! Serialization of a [`ComposeDocument`] to text.

use runcompose_common::config::{ConverterConfig, OutputFormat};
use runcompose_common::constants::DOCUMENT_HEADER;
use runcompose_common::error::Result;

use crate::generator::ComposeDocument;

/// Options for YAML rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix the document with descriptive comment lines.
    pub header: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { header: true }
    }
}

/// Renders block-style YAML, keys in declaration and insertion order.
///
/// # Errors
///
/// Returns [`ConvertError::Yaml`](runcompose_common::error::ConvertError::Yaml)
/// if serialization fails.
pub fn render_yaml(document: &ComposeDocument, options: &RenderOptions) -> Result<String> {
    let body = serde_yaml::to_string(document)?;
    if !options.header {
        return Ok(body);
    }
    let mut out = DOCUMENT_HEADER.join("\n");
    out.push_str("\n\n");
    out.push_str(&body);
    Ok(out)
}

/// Renders pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`ConvertError::Json`](runcompose_common::error::ConvertError::Json)
/// if serialization fails.
pub fn render_json(document: &ComposeDocument) -> Result<String> {
    let mut out = serde_json::to_string_pretty(document)?;
    out.push('\n');
    Ok(out)
}

/// Renders in the format selected by `config`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(document: &ComposeDocument, config: &ConverterConfig) -> Result<String> {
    match config.format {
        OutputFormat::Yaml => render_yaml(
            document,
            &RenderOptions {
                header: config.header,
            },
        ),
        OutputFormat::Json => render_json(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::build_document;
    use crate::mapper::map_to_service;
    use crate::parser::parse_command;

    fn document(line: &str) -> ComposeDocument {
        let parsed = parse_command(line).expect("should parse");
        build_document("3.9", vec![map_to_service(&parsed)], &[None])
    }

    #[test]
    fn yaml_starts_with_header_then_blank_line() {
        let yaml = render_yaml(&document("docker run redis"), &RenderOptions::default())
            .expect("render");
        let mut lines = yaml.lines();
        assert_eq!(lines.next(), Some("# Docker Compose configuration"));
        assert_eq!(lines.next(), Some("# Generated from docker run commands"));
        assert_eq!(lines.next(), Some(""));
    }

    #[test]
    fn yaml_without_header_has_no_comments() {
        let yaml = render_yaml(&document("docker run redis"), &RenderOptions { header: false })
            .expect("render");
        assert!(!yaml.contains('#'));
        assert!(yaml.starts_with("version:"));
    }

    #[test]
    fn yaml_keeps_key_order() {
        let yaml = render_yaml(
            &document("docker run -e B=1 -e A=2 -p 80:80 nginx"),
            &RenderOptions { header: false },
        )
        .expect("render");
        let version = yaml.find("version:").expect("version");
        let services = yaml.find("services:").expect("services");
        let image = yaml.find("image:").expect("image");
        let ports = yaml.find("ports:").expect("ports");
        let env = yaml.find("environment:").expect("environment");
        assert!(version < services && services < image && image < ports && ports < env);
        assert!(yaml.find("B:").expect("B") < yaml.find("A:").expect("A"));
    }

    #[test]
    fn yaml_round_trips_as_values() {
        let yaml = render_yaml(
            &document("docker run -p 8080:80 -v data:/data nginx"),
            &RenderOptions::default(),
        )
        .expect("render");
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("valid yaml");
        assert_eq!(value["version"].as_str(), Some("3.9"));
        assert_eq!(value["services"]["nginx"]["ports"][0].as_str(), Some("8080:80"));
        assert_eq!(
            value["services"]["nginx"]["volumes"][0]["source"].as_str(),
            Some("data")
        );
        assert!(value["volumes"]["data"].is_mapping());
    }

    #[test]
    fn json_is_pretty_and_parseable() {
        let json = render_json(&document("docker run --rm -d redis")).expect("render");
        assert!(json.contains("\n  \"services\""));
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["services"]["redis"]["image"], "redis");
    }

    #[test]
    fn render_dispatches_on_format() {
        let doc = document("docker run redis");
        let config = ConverterConfig {
            format: OutputFormat::Json,
            ..ConverterConfig::default()
        };
        assert!(render(&doc, &config).expect("render").starts_with('{'));
        assert!(
            render(&doc, &ConverterConfig::default())
                .expect("render")
                .starts_with("# Docker Compose")
        );
    }
}
