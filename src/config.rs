use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Screen {
    #[default]
    Calculator,
    Editor,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Calculator => "Calculator",
            Screen::Editor => "Editor",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Screen::Calculator => Screen::Editor,
            Screen::Editor => Screen::Calculator,
        }
    }
}

/// Terminal calculator and single-file editor.
#[derive(Debug, Parser)]
#[command(name = "supercalc", version)]
pub struct Cli {
    /// Evaluate one expression, print the result and exit
    #[arg(short, long, value_name = "EXPR")]
    pub eval: Option<String>,

    /// Screen shown when the terminal UI starts
    #[arg(long, value_enum, default_value_t = Screen::Calculator)]
    pub screen: Screen,

    /// Use the line-oriented calculator instead of the terminal UI
    #[arg(long)]
    pub line: bool,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Fails when the requested interactive front end was not compiled in.
    pub fn check_interactive_mode(&self) -> Result<()> {
        if self.line && !cfg!(feature = "line") {
            bail!("--line needs a build with the `line` feature");
        }
        if !self.line && !cfg!(feature = "tui") {
            bail!("no terminal UI in this build; use --line, --eval, or enable the `tui` feature");
        }
        Ok(())
    }
}

/// Installs the global subscriber. Interactive modes own the terminal, so
/// they only log when a log file was given.
pub fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .with_context(|| format!("invalid log filter '{}'", cli.log_level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match (&cli.log_file, &cli.eval) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        (None, Some(_)) => builder.with_writer(std::io::stderr).try_init(),
        (None, None) => return Ok(()),
    };
    installed.map_err(|e| anyhow!(e))
}
