//! `cgo` command-line interface

use anyhow::{Context, Result};
use cgo_agent::{
    fetch_state, AgentCloner, AgentLocator, ClonedAgent, InMemoryDirectory, JurisdictionMode,
    SessionState,
};
use cgo_core::{telemetry, CgoConfig, Orchestrator};
use cgo_template::{BlobStore, FsBlobStore, InferenceContext, KeywordMatcher, TemplateCatalog};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("cgo")
        .version(cgo_core::VERSION)
        .about("Code Generation Orchestrator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .subcommand(
            Command::new("catalog")
                .about("List the template catalog")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Directory holding the catalog blob"),
                ),
        )
        .subcommand(
            Command::new("select")
                .about("Select a template for a project request")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Directory holding the catalog blob"),
                )
                .arg(
                    Arg::new("query")
                        .long("query")
                        .required(true)
                        .help("Free-text project request"),
                )
                .arg(
                    Arg::new("user")
                        .long("user")
                        .help("Requesting user, forwarded to the matcher"),
                ),
        )
        .subcommand(
            Command::new("clone")
                .about("Clone a session state into a fresh agent")
                .arg(
                    Arg::new("state")
                        .long("state")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("JSON file with the source agent's state"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<CgoConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => CgoConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(CgoConfig::default()),
    }
}

fn orchestrator(config: &CgoConfig, dir: PathBuf) -> Result<Orchestrator> {
    Ok(Orchestrator::builder(config.clone())
        .catalog_store(Arc::new(FsBlobStore::new(dir)))
        .matcher(Arc::new(KeywordMatcher::new()))
        .build()?)
}

fn dir_arg(args: &ArgMatches) -> Result<PathBuf> {
    args.get_one::<PathBuf>("dir")
        .cloned()
        .context("--dir is required")
}

async fn list_catalog(config: &CgoConfig, args: &ArgMatches) -> Result<()> {
    let store = FsBlobStore::new(dir_arg(args)?);
    let key = config.templates.catalog_key.as_str();

    let bytes = store
        .get(key)
        .await?
        .with_context(|| format!("no catalog at {}", store.root().join(key).display()))?;
    let catalog = TemplateCatalog::from_json(&bytes).context("parsing catalog")?;

    for entry in catalog.entries() {
        println!(
            "{:<32} {:<12} {}",
            entry.name,
            entry.language.as_deref().unwrap_or("-"),
            entry.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn select(config: &CgoConfig, args: &ArgMatches) -> Result<()> {
    let query = args
        .get_one::<String>("query")
        .context("--query is required")?;
    let mut context = InferenceContext::new();
    if let Some(user) = args.get_one::<String>("user") {
        context = context.with_user_id(user.clone());
    }

    let resolution = orchestrator(config, dir_arg(args)?)?
        .select_template_for_query(query, &context)
        .await?;
    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}

/// Load `state` into a scratch in-memory directory and clone it
async fn clone_snapshot(
    config: &CgoConfig,
    state: SessionState,
) -> Result<(ClonedAgent, SessionState)> {
    let directory = InMemoryDirectory::with_mailbox_capacity(config.agents.mailbox_capacity);
    let locator =
        AgentLocator::new(Arc::new(directory)).with_location_hint(config.location_hint());
    let cloner = AgentCloner::new(locator.clone(), config.agents.id_format.generator());

    let source = state.session_id.clone();
    locator
        .resolve(&source, JurisdictionMode::Local)
        .set_state(state)
        .await?;

    let cloned = cloner.clone_agent(&source).await?;
    let cloned_state = fetch_state(&cloned.handle).await?;
    Ok((cloned, cloned_state))
}

async fn clone_state(config: &CgoConfig, args: &ArgMatches) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("state")
        .context("--state is required")?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading state {}", path.display()))?;
    let state: SessionState = serde_json::from_str(&raw).context("parsing state")?;

    let (cloned, cloned_state) = clone_snapshot(config, state).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "agentId": cloned.identity,
            "state": cloned_state,
        }))?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    telemetry::init(&config.logging)?;

    match matches.subcommand() {
        Some(("catalog", args)) => list_catalog(&config, args).await,
        Some(("select", args)) => select(&config, args).await,
        Some(("clone", args)) => clone_state(&config, args).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn select_requires_query() {
        let result = cli().try_get_matches_from(["cgo", "select", "--dir", "."]);
        assert!(result.is_err());
    }

    #[test]
    fn global_config_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["cgo", "catalog", "--dir", ".", "--config", "cgo.toml"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(
            args.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("cgo.toml"))
        );
    }

    #[tokio::test]
    async fn clone_snapshot_needs_no_catalog() {
        let state: SessionState = serde_json::from_value(serde_json::json!({
            "sessionId": "s1",
            "currentDevState": 3,
            "pendingUserInputs": ["add a footer"],
            "projectName": "notes"
        }))
        .unwrap();

        let (cloned, copy) = clone_snapshot(&CgoConfig::default(), state).await.unwrap();

        assert_ne!(cloned.identity.as_str(), "s1");
        assert_eq!(copy.session_id, cloned.identity);
        assert!(copy.pending_user_inputs.is_empty());
        assert_eq!(copy.content().get("projectName"), Some(&serde_json::json!("notes")));
    }
}
