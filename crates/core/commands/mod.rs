use std::io::Write;

use shelf::{isbn, Config, Engine};

use clap::Subcommand;
use eyre::{eyre, Context};
use log::{info, trace, warn};

use crate::app::{write_record, Output};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Look up books and print the reconciled records as JSON, one per line
    ///
    /// ISBNs are looked up one after another. A book that neither catalog knows still produces
    /// a record with a placeholder title.
    #[clap(arg_required_else_help = true)]
    Lookup {
        /// The ISBN-13s to look up, hyphens are allowed
        #[clap(required = true)]
        isbns: Vec<String>,

        /// Pretty print each record
        #[clap(long)]
        pretty: bool,

        /// Leave the upstream payload out of the records
        #[clap(long)]
        no_raw: bool,
    },

    /// Verify the check digit of ISBN-13s without contacting any catalog
    #[clap(arg_required_else_help = true)]
    Check {
        /// The ISBN-13s to check, hyphens are allowed
        #[clap(required = true)]
        isbns: Vec<String>,
    },
}

impl Commands {
    pub fn execute<W: Write>(self, config: Config, out: &mut W) -> eyre::Result<()> {
        match self {
            Commands::Lookup {
                isbns,
                pretty,
                no_raw,
            } => {
                // reject bad input before any request is sent
                let isbns = isbns
                    .iter()
                    .map(|s| isbn::normalize(s))
                    .collect::<Result<Vec<_>, _>>()?;

                let engine = Engine::new(shelf::http_client()?, config);
                if engine.config().primary_key().is_none() {
                    info!("No Google Books API key - searching Open Library only");
                }

                let output = Output {
                    pretty,
                    raw: !no_raw,
                };

                for isbn in isbns {
                    if !isbn::has_valid_check_digit(&isbn) {
                        warn!("'{isbn}' is not a valid ISBN-13, looking it up anyway");
                    }

                    let record = engine
                        .reconcile(&isbn)
                        .wrap_err_with(|| format!("Lookup of ISBN '{isbn}' failed"))?;
                    trace!("Writing record for '{isbn}'");
                    write_record(out, record, output)?;
                }
                Ok(())
            }
            Commands::Check { isbns } => {
                let mut invalid = 0;
                for input in isbns {
                    let digits = isbn::digits_only(&input);
                    let valid = isbn::has_valid_check_digit(&digits);
                    if !valid {
                        invalid += 1;
                    }
                    writeln!(out, "{input}: {}", if valid { "valid" } else { "invalid" })?;
                }

                if invalid == 0 {
                    Ok(())
                } else {
                    Err(eyre!("{invalid} invalid ISBN-13(s) found"))
                }
            }
        }
    }
}
