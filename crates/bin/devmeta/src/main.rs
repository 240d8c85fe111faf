//! # devmeta: device metadata query tool
//!
//! Composition root that loads the catalogue and answers one query.
//!
//! ## Responsibilities
//! - Parse the command line and configuration (config file, env vars)
//! - Initialize logging on stderr
//! - Load the catalogue snapshot into the in-memory store
//! - Construct application services, injecting the store via port traits
//! - Read the query document named on the command line and print the result
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod query;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::query::{Query, Services};

#[derive(Debug, Parser)]
#[command(name = "devmeta", version)]
#[command(about = "Answer device metadata queries against a catalogue snapshot", long_about = None)]
struct Cli {
    /// Query document (JSON)
    query: PathBuf,

    /// Config file path
    #[arg(short, long, default_value = "devmeta.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let text = tokio::fs::read_to_string(&cli.query)
        .await
        .with_context(|| format!("failed to read query {}", cli.query.display()))?;
    let query: Query = serde_json::from_str(&text).context("invalid query document")?;

    // Catalogue
    let store = devmeta_adapter_catalogue_json::Config {
        path: config.catalogue.path.clone().into(),
    }
    .build()
    .await?;

    // Services
    let services = Services::new(&store, &config);

    let result = services.execute(query).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_build_consistent_command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_default_config_path_when_only_query_given() {
        let cli = Cli::try_parse_from(["devmeta", "query.json"]).unwrap();
        assert_eq!(cli.query, PathBuf::from("query.json"));
        assert_eq!(cli.config, PathBuf::from("devmeta.toml"));
    }

    #[test]
    fn should_accept_config_flag() {
        let args = ["devmeta", "--config", "/etc/devmeta.toml", "query.json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/devmeta.toml"));
    }

    #[test]
    fn should_require_query_argument() {
        let err = Cli::try_parse_from(["devmeta"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn should_answer_help_instead_of_reading_a_query() {
        let err = Cli::try_parse_from(["devmeta", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
