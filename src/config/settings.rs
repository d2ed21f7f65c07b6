use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::expand_path;
use crate::pdf::PdfOptions;
use crate::print::DEFAULT_SETTLE_DELAY;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub pdf: PdfSettings,
    #[serde(default)]
    pub delivery: DeliverySettings,
    #[serde(default)]
    pub print: PrintSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            template: default_template(),
            theme: default_theme(),
        }
    }
}

fn default_template() -> String {
    "classic".to_string()
}

fn default_theme() -> String {
    "blue".to_string()
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PdfSettings {
    #[serde(flatten)]
    pub options: PdfOptions,
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl PdfSettings {
    /// Where finished PDFs are saved, `<config>/output` unless overridden
    pub fn output_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => expand_path(dir),
            None => config_dir.join("output"),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeliverySettings {
    /// Client identity used to choose between saving and sharing
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub share_command: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PrintSettings {
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default)]
    pub spool_dir: Option<String>,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            settle_delay_ms: default_settle_delay_ms(),
            spool_dir: None,
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY.as_millis() as u64
}

impl PrintSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn spool_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.spool_dir {
            Some(dir) => expand_path(dir),
            None => config_dir.join("spool"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{FontScale, Orientation, PaperSize};

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.defaults.template, "classic");
        assert_eq!(settings.defaults.theme, "blue");
        assert_eq!(settings.pdf.options, PdfOptions::default());
        assert_eq!(settings.print.settle_delay(), DEFAULT_SETTLE_DELAY);
        assert!(settings.delivery.share_command.is_empty());
        assert_eq!(
            settings.pdf.output_dir(Path::new("/cfg")),
            PathBuf::from("/cfg/output")
        );
    }

    #[test]
    fn test_full_settings() {
        let settings: Settings = toml::from_str(
            r#"
[defaults]
template = "modern"
theme = "green"

[pdf]
paper_size = "a5"
orientation = "landscape"
font_size = "large"
output_dir = "/tmp/bills"

[delivery]
user_agent = "Mozilla/5.0 (Linux; Android 14)"
share_command = ["kdeconnect-cli", "--share"]

[print]
command = ["lp"]
settle_delay_ms = 500
"#,
        )
        .unwrap();

        assert_eq!(settings.defaults.template, "modern");
        assert_eq!(settings.pdf.options.paper_size, PaperSize::A5);
        assert_eq!(settings.pdf.options.orientation, Orientation::Landscape);
        assert_eq!(settings.pdf.options.font_size, FontScale::Large);
        assert_eq!(
            settings.pdf.output_dir(Path::new("/cfg")),
            PathBuf::from("/tmp/bills")
        );
        assert_eq!(settings.delivery.share_command.len(), 2);
        assert_eq!(settings.print.command, vec!["lp"]);
        assert_eq!(settings.print.settle_delay(), Duration::from_millis(500));
    }
}
