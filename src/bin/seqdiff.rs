use ::console::Term;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap::FromArgMatches;
#[cfg(panic = "unwind")]
use human_panic::setup_panic;
use libseqdiff::cli;
use libseqdiff::cli::Args;
use libseqdiff::config::{Config, ReadError};
use libseqdiff::console_utils;
use libseqdiff::diff::{self, Algorithms};
use libseqdiff::generate_document;
use libseqdiff::patch::verify_round_trip;
use libseqdiff::render::{DisplayData, DocumentDiffData, Renderer, Renderers};
use log::{LevelFilter, error, info, warn};
use serde_json as json;
use std::io;
use strum::IntoEnumIterator;

#[cfg(feature = "jemallocator")]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Return an instance of [Config] from a config file path (or the inferred default path)
///
/// If a config path isn't provided or there is some other failure, fall back to the default
/// config. This will error out if a config is found but is found to be an invalid config.
fn derive_config(args: &Args) -> Result<Config> {
    if args.no_config {
        info!("`no_config` specified, falling back to default config");
        return Ok(Config::default());
    }
    match Config::try_from_file(args.config.as_ref()) {
        Ok(config) => Ok(config),
        Err(e) => match e {
            // Not finding a config file isn't a hard error, the defaults are fine
            ReadError::ReadFileFailure(_) | ReadError::NoDefault => {
                warn!("{} - falling back to default config", e);
                Ok(Config::default())
            }
            // A config file that exists but doesn't parse is reported to the user
            ReadError::DeserializationFailure(e) => {
                error!("Failed to deserialize config file: {}", e);
                Err(e)
            }
        },
    }
}

/// Take the diff of two files
fn run_diff(args: Args, config: Config) -> Result<()> {
    // Resolve the algorithm and renderer up front so a bad choice is reported before any work is
    // done.
    let algorithm = config.diff.get_algorithm(args.algorithm.as_deref())?;
    let renderer = config.formatting.get_renderer(args.renderer)?;
    info!("Diffing with {algorithm}, rendering with {renderer}");

    let path_old = args.old.context("Missing the old file")?;
    let path_new = args.new.context("Missing the new file")?;
    let doc_old = generate_document(path_old)?;
    let doc_new = generate_document(path_new)?;

    let processor = &config.input_processing;
    let tokens_old = processor.tokenize(&doc_old.text);
    let tokens_new = processor.tokenize(&doc_new.text);
    let options = processor.diff_options(config.diff.cache_equals);
    let ops = diff::diff(&algorithm, &tokens_old, &tokens_new, options)?;
    info!(
        "Found {} operations between {} and {} tokens",
        ops.len(),
        tokens_old.len(),
        tokens_new.len()
    );

    if args.check {
        verify_round_trip(&tokens_old, &tokens_new, &ops, |a, b| {
            processor.same_token(a, b)
        })
        .context("The diff does not replay to the documents it was computed from")?;
        info!("Diff replays in both directions");
    }

    let old_filename = doc_old.filename();
    let new_filename = doc_new.filename();
    let params = DisplayData {
        ops: &ops,
        old: DocumentDiffData {
            filename: &old_filename,
            tokens: &tokens_old,
        },
        new: DocumentDiffData {
            filename: &new_filename,
            tokens: &tokens_new,
        },
    };
    // Use a buffered terminal instead of a normal unbuffered terminal so we can amortize the cost
    // of printing.
    let mut buf_writer = Term::buffered_stdout();
    let term_info = buf_writer.clone();
    renderer.render(&mut buf_writer, &params, Some(&term_info))?;
    buf_writer.flush()?;
    Ok(())
}

/// Serialize the default options struct to a json file and print that to stdout
fn dump_default_config() -> Result<()> {
    let config = Config::default();
    println!("{}", json::to_string_pretty(&config)?);
    Ok(())
}

/// Print the algorithms and renderers this build supports
fn list_supported() {
    println!("Algorithms:");
    for algorithm in Algorithms::iter() {
        println!("- {algorithm}");
    }
    println!("Renderers:");
    for renderer in Renderers::iter() {
        println!("- {renderer}");
    }
}

/// Print shell completion scripts to `stdout`.
///
/// This is a basic wrapper for the subcommand.
fn print_shell_completion(shell: clap_complete::Shell) {
    let mut app = cli::Args::command();
    clap_complete::generate(shell, &mut app, "seqdiff", &mut io::stdout());
}

fn main() -> Result<()> {
    // Set up a panic handler that will yield more human-readable errors.
    #[cfg(panic = "unwind")]
    setup_panic!();

    use cli::Command;

    let command = Args::command();
    let matches = command.get_matches();
    let args = Args::from_arg_matches(&matches)?;

    // We parse the config as early as possible so users can get quick feedback if anything is off
    // with their config.
    let config = derive_config(&args)?;

    // Users can supply a command that will *not* run a diff, which we handle here
    if let Some(cmd) = args.cmd {
        match cmd {
            Command::List => list_supported(),
            Command::DumpDefaultConfig => dump_default_config()?,
            Command::GenCompletion { shell } => print_shell_completion(shell),
        }
    } else {
        let log_level = if args.debug {
            LevelFilter::Trace
        } else {
            LevelFilter::Off
        };
        pretty_env_logger::formatted_timed_builder()
            .filter_level(log_level)
            .init();
        console_utils::set_term_colors(args.color_output);
        run_diff(args, config)?;
    }
    Ok(())
}
