use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use chad::{
  cli::{Cli, Commands},
  config::Config,
  render,
};
use chad_commonmark::{
  MarkdownProcessor,
  processor::process_with_recovery,
  speech::to_speech_text,
  syntax::create_default_manager,
};
use color_eyre::eyre::{Context, Result, bail, eyre};
use log::{LevelFilter, info};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return init(output, format, *force);
  }

  let config = Config::load(&cli).map_err(|e| eyre!("{e:#}"))?;

  match &cli.command {
    Commands::Render {
      input,
      output,
      directives,
      ..
    } => render(&config, input.as_deref(), output.as_deref(), *directives),
    Commands::Speech { input } => {
      let content =
        render::read_input(input.as_deref()).map_err(|e| eyre!("{e:#}"))?;
      write_stdout(&to_speech_text(&content))
    },
    Commands::ThemeCss { list, .. } => theme_css(&config, *list),
    Commands::Init { .. } => Ok(()),
  }
}

fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent() {
    if !parent.as_os_str().is_empty() && !parent.exists() {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }
  }

  Config::generate_default_config(format, output)
    .map_err(|e| eyre!("{e:#}"))
    .wrap_err_with(|| {
      format!(
        "Failed to generate configuration file: {}",
        output.display()
      )
    })?;

  info!("Configuration file created. Edit it to customize rendering.");
  Ok(())
}

fn render(
  config: &Config,
  input: Option<&Path>,
  output: Option<&Path>,
  directives: bool,
) -> Result<()> {
  let processor = MarkdownProcessor::new(config.markdown.to_options());

  if let Some(input_dir) = input.filter(|path| path.is_dir()) {
    let output_dir = output
      .map(Path::to_path_buf)
      .or_else(|| config.output_dir.clone())
      .ok_or_else(|| {
        eyre!("Rendering a directory needs --output or `output_dir` in the config")
      })?;
    let rendered =
      render::render_directory(config, &processor, input_dir, &output_dir)
        .map_err(|e| eyre!("{e:#}"))?;
    if directives {
      let json = render::batch_directives_json(input_dir, &rendered)
        .map_err(|e| eyre!("{e:#}"))?;
      write_stdout(&json)?;
    }
    return Ok(());
  }

  let content = render::read_input(input).map_err(|e| eyre!("{e:#}"))?;
  let document = process_with_recovery(&processor, &content);
  let text = if directives {
    render::directives_json(&document.navigation).map_err(|e| eyre!("{e:#}"))?
  } else {
    document.html
  };

  match output {
    Some(path) => {
      fs::write(path, text)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      info!("Wrote {}", path.display());
      Ok(())
    },
    None => write_stdout(&text),
  }
}

fn theme_css(config: &Config, list: bool) -> Result<()> {
  let manager = create_default_manager()?;
  if list {
    let mut themes = manager.highlighter().available_themes();
    themes.sort();
    return write_stdout(&themes.join("\n"));
  }
  let css = render::theme_stylesheet(config.markdown.highlight_theme.as_deref())
    .map_err(|e| eyre!("{e:#}"))?;
  write_stdout(&css)
}

fn write_stdout(text: &str) -> Result<()> {
  let mut stdout = io::stdout().lock();
  stdout.write_all(text.as_bytes())?;
  if !text.ends_with('\n') {
    stdout.write_all(b"\n")?;
  }
  stdout.flush()?;
  Ok(())
}
