use anyhow::Context;
use clap::{CommandFactory, Parser};
use slovnik::output::{render_info, render_json, render_results};
use slovnik::{CacheConfig, DictionaryManager};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Search the Interslavic cross-language dictionary
#[derive(Parser, Debug)]
#[command(name = "slovnik", version)]
#[command(about = "Search the Interslavic cross-language dictionary", long_about = None)]
#[command(after_help = "Examples:
  slovnik water              Search for \"water\" in all languages
  slovnik --lang ru вода     Search for \"вода\" and show Russian translations
  slovnik --refresh water    Force refresh cache, then search
  slovnik --json water fire  Output results as JSON
  slovnik --info             Show cache information")]
struct Args {
    /// Words to search for (substring matching)
    words: Vec<String>,

    /// Force re-download of dictionary data
    #[arg(long)]
    refresh: bool,

    /// Only show entries with a translation in this language (e.g. en, ru, pl)
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Show information about the cached dictionary
    #[arg(long)]
    info: bool,

    /// Match whole words only instead of substrings
    #[arg(long)]
    whole_word: bool,

    /// Directory holding the dictionary cache
    #[arg(long, env = "SLOVNIK_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// URL or file path of the dictionary CSV
    #[arg(long, env = "SLOVNIK_SOURCE")]
    source: Option<String>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig::default();
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        config
    }
}

/// Whether the cache has to be rebuilt before it can be searched.
fn needs_refresh(manager: &DictionaryManager) -> bool {
    if !manager.cache_exists() {
        info!("No dictionary cache at {:?}", manager.store_path());
        return true;
    }
    match manager.needs_schema_upgrade() {
        Ok(false) => false,
        Ok(true) => {
            warn!("Database schema update required. Refreshing...");
            true
        }
        Err(e) => {
            warn!("Unreadable cache metadata ({}). Refreshing...", e);
            true
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let manager = DictionaryManager::new(args.cache_config())?;
    let mut stdout = io::stdout().lock();

    if args.info {
        let description = manager.describe_cache()?;
        render_info(&mut stdout, description.as_ref())?;
        return Ok(ExitCode::SUCCESS);
    }

    if args.words.is_empty() && !args.refresh {
        Args::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    }

    let refresh = args.refresh || needs_refresh(&manager);

    if refresh {
        let loaded = manager
            .refresh_from_source()
            .with_context(|| format!("Error initializing dictionary from {}", manager.config().source))?;
        info!(rows = loaded.row_count, "Dictionary cache ready");
    }

    if args.words.is_empty() {
        writeln!(stdout, "Dictionary cache refreshed successfully.")?;
        return Ok(ExitCode::SUCCESS);
    }

    let lang = args.lang.as_deref();
    let results = if args.whole_word {
        let mut results = Vec::new();
        for word in &args.words {
            results.extend(manager.lookup_word(word, lang)?);
        }
        results
    } else {
        manager.search(&args.words, lang)?
    };

    if args.json {
        render_json(&mut stdout, &results)?;
    } else {
        render_results(&mut stdout, &results)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(dir: &std::path::Path) -> DictionaryManager {
        let config = CacheConfig::new(dir).with_map_size(10 * 1024 * 1024);
        DictionaryManager::new(config).unwrap()
    }

    #[test]
    fn test_needs_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        assert!(needs_refresh(&manager));

        manager
            .refresh_from("dictionary.csv", "isv,en\nvoda,water\n".as_bytes())
            .unwrap();
        assert!(!needs_refresh(&manager));

        std::fs::write(manager.metadata_path(), "garbage").unwrap();
        assert!(needs_refresh(&manager));
    }
}
