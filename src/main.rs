#![cfg_attr(not(feature = "tui"), allow(dead_code))]

mod calc_engine;
mod calculator;
mod clipboard;
mod config;
mod editor;
#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::{Context, Result};
use clap::Parser;
use config::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(&cli)?;

    match cli.eval.as_deref() {
        Some(expression) => run_once(expression),
        None => run_interactive(&cli),
    }
}

fn run_once(expression: &str) -> Result<()> {
    let result = calc_engine::evaluate(expression)
        .with_context(|| format!("failed to evaluate '{}'", expression))?;
    println!("{}", result);
    Ok(())
}

fn run_interactive(cli: &Cli) -> Result<()> {
    cli.check_interactive_mode()?;

    #[cfg(feature = "line")]
    {
        if cli.line {
            return line_mode::run_line();
        }
    }

    #[cfg(feature = "tui")]
    {
        tui_mode::run_tui(cli.screen)
    }
    #[cfg(not(feature = "tui"))]
    {
        anyhow::bail!("no interactive mode in this build; enable the `tui` or `line` feature, or use --eval")
    }
}
