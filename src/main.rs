mod cli;
mod config;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use sluice_converters::{DocumentConverter, TextFileToDocument};
use sluice_core::{MetaArg, Source};
use sluice_router::{FileTypeRouter, MimeRegistry, UNCLASSIFIED};

use crate::cli::{Cli, Command, ConvertArgs, RouteArgs};
use crate::config::Config;

fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)?;

    match cli.command {
        Command::Route(args) => route(config, args),
        Command::Convert(args) => convert(config, args),
    }
}

fn route(mut config: Config, args: RouteArgs) -> anyhow::Result<()> {
    if !args.rules.is_empty() {
        config.router.rules = args.rules;
    }
    config
        .router
        .additional_mime_types
        .extend(args.mime_types);
    config.validate()?;

    let meta = parse_meta(args.meta.meta.as_deref())?;
    let router = build_router(&config, config.router.rules.iter().cloned())?;
    let sources: Vec<Source> = args.files.into_iter().map(Source::from).collect();

    let partition = router.run(sources, meta).context("routing failed")?;
    print_json(&output::partition_to_json(&router, &partition))
}

fn convert(mut config: Config, args: ConvertArgs) -> anyhow::Result<()> {
    if let Some(encoding) = args.encoding {
        config.converter.encoding = encoding;
    }
    if args.full_path {
        config.converter.store_full_path = true;
    }
    config.validate()?;

    let converter = TextFileToDocument::new(config.encoding()?, config.converter.store_full_path);
    let router = build_router(
        &config,
        converter.content_type_rules().iter().map(|r| (*r).to_owned()),
    )?;

    let meta = parse_meta(args.meta.meta.as_deref())?;
    let sources: Vec<Source> = args.files.into_iter().map(Source::from).collect();
    let mut partition = router.run(sources, meta).context("routing failed")?;

    for source in partition.remove(UNCLASSIFIED).unwrap_or_default() {
        tracing::warn!("no converter for {source}, skipping");
    }
    let convertible: Vec<Source> = partition.into_iter().flat_map(|(_, sources)| sources).collect();

    let documents = converter
        .convert(convertible, MetaArg::None)
        .context("conversion failed")?;
    tracing::info!(count = documents.len(), "converted documents");
    print_json(&serde_json::to_value(&documents)?)
}

fn build_router(
    config: &Config,
    rules: impl IntoIterator<Item = String>,
) -> anyhow::Result<FileTypeRouter> {
    let registry = MimeRegistry::with_types(&config.router.additional_mime_types);
    FileTypeRouter::with_registry(rules, registry).context("invalid router rules")
}

fn parse_meta(raw: Option<&str>) -> anyhow::Result<MetaArg> {
    let Some(raw) = raw else {
        return Ok(MetaArg::None);
    };
    let value: serde_json::Value = serde_json::from_str(raw).context("--meta is not valid JSON")?;
    MetaArg::from_json(value).context("invalid --meta")
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("SLUICE_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // stdout carries the JSON result
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
