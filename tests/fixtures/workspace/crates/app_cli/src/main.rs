//! Command-line front end for the app.

use std::path::PathBuf;
mod args;
use clap::Parser;
use app_core::render::Renderer;
use std::fs;
use anyhow::Result;
use cli_support::Config;

fn main() -> Result<()> {
    let args = args::Cli::parse();
    let config = Config::load(&PathBuf::from(args.config))?;
    let source = fs::read_to_string(&config.input)?;
    Renderer::default().print(&source);
    Ok(())
}
