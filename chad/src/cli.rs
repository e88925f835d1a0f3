use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for chad
#[derive(Parser, Debug)]
#[command(author, version, about = "Chad: render PDF chat Markdown")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to a configuration file (TOML or JSON). When omitted, `chad.toml`
  /// or `chad.json` in the working directory is used if present.
  #[arg(short = 'c', long = "config-file", global = true)]
  pub config_file: Option<PathBuf>,
}

/// All supported subcommands for the chad CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render Markdown to an HTML fragment.
  ///
  /// INPUT may be a file, a directory (every `.md`/`.markdown` file below it
  /// is rendered in parallel) or omitted/`-` to read standard input.
  Render {
    /// File or directory to render.
    input: Option<PathBuf>,

    /// Output file, or output directory when INPUT is a directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the extracted navigation directives as JSON instead of HTML.
    #[arg(long)]
    directives: bool,

    /// Use plain CommonMark, ignoring the configured Markdown options.
    #[arg(long)]
    plain: bool,

    /// Number of threads to use for directory rendering.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,

    /// Disable syntax highlighting for code blocks.
    #[arg(long = "no-highlight", action = clap::ArgAction::SetTrue)]
    no_highlight: bool,
  },

  /// Print a message as plain text for speech synthesis.
  Speech {
    /// File to read; standard input when omitted or `-`.
    input: Option<PathBuf>,
  },

  /// Print the stylesheet for highlighted code.
  ThemeCss {
    /// Theme name; defaults to the configured theme.
    #[arg(short, long)]
    theme: Option<String>,

    /// List the available themes instead.
    #[arg(long)]
    list: bool,
  },

  /// Initialize a new chad configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "chad.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
