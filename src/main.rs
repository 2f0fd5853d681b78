#![allow(dead_code)]
#![recursion_limit = "256"]

mod api;
mod application;
mod cli;
mod data;
mod domain;
mod infra;
mod ml;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("census_income=info".parse().context("Invalid log directive")?);

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.run()
}
