//! Pagewise - Entry Point

use clap::Parser;
use pagewise::config;
use pagewise::params::ParamBuilder;
use pagewise::source::{load_records, MemorySource};
use pagewise::{BrowseCache, DisplayPage, ListEngine, SortDirection};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Pagewise - page through a record file the way an admin list view does
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(version)]
#[command(about = "Serve one display page of a JSONL record file through the paging engine")]
pub struct Args {
    /// Path to JSONL record file (one record per line)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Display page to show (must be positive)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Submit a search for this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Apply this filter tag
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Record field the filter tag is matched against
    #[arg(long, default_value = "tag")]
    pub filter_field: String,

    /// Sort by this field (ascending unless --desc)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Records per upstream fetch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub chunk_size: Option<u32>,

    /// Records per display page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(with_env, args.chunk_size, args.page_size)
    };

    pagewise::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let engine_config = config.engine_config()?;
    let records = load_records(&args.data)?;
    info!(count = records.len(), path = %args.data.display(), "Records loaded");

    let source = MemorySource::new(records).with_filter_field(args.filter_field.clone());
    let params = ParamBuilder::new(config.params.clone(), Default::default());
    let mut engine =
        ListEngine::new(source, BrowseCache::new(), engine_config).with_params(params);

    if let Some(field) = &args.sort {
        let wanted = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        // Re-selecting the current field toggles its direction.
        engine.change_sort(field).await?;
        if engine.sort().direction != wanted {
            engine.change_sort(field).await?;
        }
    }
    if let Some(tag) = &args.filter {
        engine.change_filter(tag.as_str()).await?;
    }
    if let Some(text) = &args.search {
        engine.set_search_text(text.as_str());
        engine.submit_search().await?;
    }

    let projection = engine.change_page(DisplayPage::new(args.page)?).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &projection.records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;

    eprintln!(
        "page {} of {} ({} records, mode {:?})",
        projection.page,
        projection.page_count,
        projection.total_count,
        engine.mode()
    );

    engine.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["pagewise", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["pagewise", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_data_is_required() {
        let result = Args::try_parse_from(["pagewise"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_minimal_args_defaults() {
        let args = Args::parse_from(["pagewise", "--data", "records.jsonl"]);
        assert_eq!(args.data, PathBuf::from("records.jsonl"));
        assert_eq!(args.page, 1);
        assert_eq!(args.search, None);
        assert_eq!(args.filter, None);
        assert_eq!(args.filter_field, "tag");
        assert_eq!(args.sort, None);
        assert!(!args.desc);
        assert_eq!(args.chunk_size, None);
        assert_eq!(args.page_size, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_page_rejects_zero() {
        let result = Args::try_parse_from(["pagewise", "-d", "r.jsonl", "-p", "0"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from([
            "pagewise", "-d", "r.jsonl", "-p", "3", "-s", "alice", "-f", "admin",
        ]);
        assert_eq!(args.page, 3);
        assert_eq!(args.search, Some("alice".to_string()));
        assert_eq!(args.filter, Some("admin".to_string()));
    }

    #[test]
    fn test_desc_requires_sort() {
        let result = Args::try_parse_from(["pagewise", "-d", "r.jsonl", "--desc"]);
        assert!(result.is_err());

        let args = Args::parse_from(["pagewise", "-d", "r.jsonl", "--sort", "email", "--desc"]);
        assert_eq!(args.sort, Some("email".to_string()));
        assert!(args.desc);
    }

    #[test]
    fn test_size_overrides_reject_zero() {
        assert!(Args::try_parse_from(["pagewise", "-d", "r.jsonl", "--chunk-size", "0"]).is_err());
        assert!(Args::try_parse_from(["pagewise", "-d", "r.jsonl", "--page-size", "0"]).is_err());

        let args = Args::parse_from([
            "pagewise", "-d", "r.jsonl", "--chunk-size", "500", "--page-size", "25",
        ]);
        assert_eq!(args.chunk_size, Some(500));
        assert_eq!(args.page_size, Some(25));
    }

    #[test]
    fn test_config_flag() {
        let args = Args::parse_from(["pagewise", "-d", "r.jsonl", "--config", "/tmp/pw.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/pw.toml")));
    }
}
