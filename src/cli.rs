use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sluice", version, about = "Route files by content type and convert text sources to documents")]
pub struct Cli {
    /// Path to the TOML config (defaults to $SLUICE_CONFIG, then config/default.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Partition files by content type and print the buckets as JSON
    Route(RouteArgs),
    /// Convert text files into documents and print them as JSON
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Content type or regex rule; repeat to add more (replaces configured rules)
    #[arg(long = "rule", value_name = "RULE")]
    pub rules: Vec<String>,

    /// Extra association as MIME=EXT, e.g. application/x-ndjson=.ndjson
    #[arg(long = "mime-type", value_name = "MIME=EXT", value_parser = parse_mime_pair)]
    pub mime_types: Vec<(String, String)>,

    #[command(flatten)]
    pub meta: MetaArgs,

    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Text encoding used when a source does not declare one
    #[arg(long)]
    pub encoding: Option<String>,

    /// Keep full file paths in document metadata
    #[arg(long)]
    pub full_path: bool,

    #[command(flatten)]
    pub meta: MetaArgs,

    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MetaArgs {
    /// Metadata as JSON: one object for all files, or a list with one object per file
    #[arg(long, value_name = "JSON")]
    pub meta: Option<String>,
}

fn parse_mime_pair(s: &str) -> Result<(String, String), String> {
    let (mime, ext) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MIME=EXT, got '{s}'"))?;
    let (mime, ext) = (mime.trim(), ext.trim());
    if mime.is_empty() || ext.is_empty() {
        return Err(format!("expected MIME=EXT, got '{s}'"));
    }
    Ok((mime.to_owned(), ext.to_owned()))
}
