#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::process;

mod app;
mod commands;

use commands::Commands;

use shelf::Config;

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                key,
                retries,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let mut config = Config::from_env(key);
    if let Some(retries) = retries {
        trace!("Overriding retry budget with {retries}");
        config.retry.retries = retries;
    }

    command.execute(config, &mut std::io::stdout().lock())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "shelf")]
#[clap(about = "Look up books by ISBN-13 across Google Books and Open Library")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Google Books API key
    ///
    /// The GOOGLE_BOOKS_API_KEY environment variable takes precedence when it is set. Without
    /// any key only Open Library is searched.
    #[clap(short, long, global = true)]
    key: Option<String>,

    /// How many times a failed request is retried
    #[clap(long, global = true)]
    retries: Option<u32>,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Only errors are written to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
