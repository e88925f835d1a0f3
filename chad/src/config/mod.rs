pub mod templates;

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chad_commonmark::{MarkdownOptions, MarkdownOptionsBuilder};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands};

const CONFIG_FILENAMES: [&str; 4] =
  ["chad.toml", "chad.json", ".chad.toml", ".chad.json"];

const fn default_true() -> bool {
  true
}

/// Configuration for chad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
  /// Output directory for directory rendering
  #[serde(default)]
  pub output_dir: Option<PathBuf>,

  /// Number of threads to use for directory rendering
  #[serde(default)]
  pub jobs: Option<usize>,

  /// Markdown rendering options
  #[serde(default)]
  pub markdown: MarkdownConfig,
}

/// The `[markdown]` table, mirroring [`MarkdownOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownConfig {
  #[serde(default = "default_true")]
  pub gfm: bool,

  #[serde(default = "default_true")]
  pub math: bool,

  #[serde(default = "default_true")]
  pub breaks: bool,

  #[serde(default = "default_true")]
  pub linkify: bool,

  #[serde(default = "default_true")]
  pub typographer: bool,

  #[serde(default = "default_true")]
  pub highlight_code: bool,

  #[serde(default)]
  pub highlight_theme: Option<String>,

  #[serde(default = "default_true")]
  pub copy_buttons: bool,

  #[serde(default = "default_true")]
  pub navigation_directives: bool,
}

impl Default for MarkdownConfig {
  fn default() -> Self {
    Self {
      gfm:                   true,
      math:                  true,
      breaks:                true,
      linkify:               true,
      typographer:           true,
      highlight_code:        true,
      highlight_theme:       None,
      copy_buttons:          true,
      navigation_directives: true,
    }
  }
}

impl MarkdownConfig {
  /// Build the renderer options this table describes.
  #[must_use]
  pub fn to_options(&self) -> MarkdownOptions {
    MarkdownOptionsBuilder::new()
      .gfm(self.gfm)
      .math(self.math)
      .breaks(self.breaks)
      .linkify(self.linkify)
      .typographer(self.typographer)
      .highlight_code(self.highlight_code)
      .highlight_theme(self.highlight_theme.clone())
      .copy_buttons(self.copy_buttons)
      .navigation_directives(self.navigation_directives)
      .build()
  }
}

impl Config {
  /// Create a new configuration from a file
  /// Only TOML and JSON are supported.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or has an
  /// unsupported extension.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).with_context(|| {
      format!("Failed to read config file: {}", path.display())
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .ok_or_else(|| {
        anyhow::anyhow!("Config file has no extension: {}", path.display())
      })?;

    match extension.as_str() {
      "json" => {
        serde_json::from_str(&content).with_context(|| {
          format!("Failed to parse JSON config from {}", path.display())
        })
      },
      "toml" => {
        toml::from_str(&content).with_context(|| {
          format!("Failed to parse TOML config from {}", path.display())
        })
      },
      _ => {
        Err(anyhow::anyhow!(
          "Unsupported config file format: {}",
          path.display()
        ))
      },
    }
  }

  /// Load config from file and CLI arguments
  ///
  /// # Errors
  ///
  /// Returns an error if an explicit or discovered config file fails to
  /// load.
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut config = if let Some(config_path) = &cli.config_file {
      Self::from_file(config_path).with_context(|| {
        format!("Failed to load config from {}", config_path.display())
      })?
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered).with_context(|| {
        format!(
          "Failed to load discovered config from {}",
          discovered.display()
        )
      })?
    } else {
      Self::default()
    };

    config.merge_with_cli(cli);
    Ok(config)
  }

  /// Merge CLI arguments into this config, prioritizing CLI values when
  /// present
  pub fn merge_with_cli(&mut self, cli: &Cli) {
    match &cli.command {
      Commands::Render {
        plain,
        jobs,
        no_highlight,
        ..
      } => {
        self.jobs = jobs.or(self.jobs);
        if *plain {
          self.markdown = MarkdownConfig {
            gfm:                   false,
            math:                  false,
            breaks:                false,
            linkify:               false,
            typographer:           false,
            highlight_code:        false,
            highlight_theme:       self.markdown.highlight_theme.take(),
            copy_buttons:          false,
            navigation_directives: false,
          };
        }
        if *no_highlight {
          self.markdown.highlight_code = false;
        }
      },
      Commands::ThemeCss {
        theme: Some(theme), ..
      } => {
        self.markdown.highlight_theme = Some(theme.clone());
      },
      _ => {},
    }
  }

  /// Search for config files in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search for config files in `dir`, in order of preference.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error for an unsupported format or if the file cannot be
  /// written.
  pub fn generate_default_config(format: &str, path: &Path) -> Result<()> {
    let config_content = templates::get_template(format)?;

    fs::write(path, config_content).with_context(|| {
      format!("Failed to write default config to {}", path.display())
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
