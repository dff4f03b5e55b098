//! Output formatting for resolved configuration.

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;

/// Output format for printed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    /// Render a value in this format.
    pub fn render(self, value: &Value) -> Result<String> {
        let rendered = match self {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };
        Ok(rendered.trim_end().to_string())
    }
}

/// Format leaf entries as `<path> = <json>` lines.
pub fn format_leaves(leaves: &[(String, Value)]) -> String {
    leaves
        .iter()
        .map(|(path, value)| format!("{path} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("yml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_str("toml"), None);
    }

    #[test]
    fn test_render_json() {
        let out = OutputFormat::Json.render(&json!({"db": {"url": "x"}})).unwrap();
        assert_eq!(out, "{\n  \"db\": {\n    \"url\": \"x\"\n  }\n}");
    }

    #[test]
    fn test_render_yaml() {
        let out = OutputFormat::Yaml.render(&json!({"db": {"url": "x"}})).unwrap();
        assert_eq!(out, "db:\n  url: x");
    }

    #[test]
    fn test_format_leaves() {
        let out = format_leaves(&[
            (".db.url".to_string(), json!("x")),
            (".db.pool".to_string(), json!(4)),
        ]);
        assert_eq!(out, ".db.url = \"x\"\n.db.pool = 4");
    }
}
