//! Command-line interface for litdoc
//! Generates a side-by-side documentation page for each source file given.
//!
//! Usage:
//!   litdoc [options] `<source>`...   - Write `<output>/<name>.html` for every source

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use litdoc::{Config, ConfigError, Context, run_batch};
use litdoc_core::default_registry;
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("litdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate side-by-side documentation pages from annotated source files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("sources")
                .help("Source files to document")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output directory (default: docs)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./litdoc.yaml if present)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("highlighter")
                .long("highlighter")
                .help("Highlighter executable (default: pygmentize)"),
        )
        .arg(
            Arg::new("tab-size")
                .long("tab-size")
                .help("Tab width passed to the highlighter")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Seconds before a highlighter run is killed; 0 disables")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .help("Files to process concurrently")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("raw-html")
                .long("raw-html")
                .help("Pass raw HTML in comments through unescaped")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only report warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("More logging (repeat for trace)")
                .action(ArgAction::Count),
        )
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("quiet") {
        "warn"
    } else {
        match matches.get_count("verbose") {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

/// Load the config file, then apply command-line overrides.
fn load_config(matches: &ArgMatches) -> Result<Config, ConfigError> {
    let explicit = matches.get_one::<PathBuf>("config");
    let mut config = Config::discover(explicit.map(PathBuf::as_path), std::path::Path::new("."))?;

    if let Some(output) = matches.get_one::<PathBuf>("output") {
        config.output_dir = output.clone();
    }
    if let Some(highlighter) = matches.get_one::<String>("highlighter") {
        config.highlighter = highlighter.clone();
    }
    if let Some(tab_size) = matches.get_one::<u32>("tab-size") {
        config.tab_size = *tab_size;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout_secs = *timeout;
    }
    if let Some(jobs) = matches.get_one::<usize>("jobs") {
        config.jobs = *jobs;
    }
    if matches.get_flag("raw-html") {
        config.raw_html = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(&matches);

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(2);
        }
    };

    let sources: Vec<PathBuf> = matches
        .get_many::<PathBuf>("sources")
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let context = Context {
        registry: default_registry(),
        highlighter: config.highlighter(),
        markdown: config.markdown(),
        output_dir: config.output_dir.clone(),
        jobs: config.jobs,
    };

    match run_batch(sources, &context).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            log::error!(
                "{} of {} files failed",
                summary.failed().count(),
                summary.outcomes.len()
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("could not prepare {}: {err}", config.output_dir.display());
            ExitCode::FAILURE
        }
    }
}
