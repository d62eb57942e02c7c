//! Command-line arguments for `santa-assign`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

/// santa-assign - Draw Secret Santa assignments from the terminal
///
/// Verifies the admin passphrase, draws a fresh set of assignments, stores
/// them and emails every participant their giftee.
#[derive(Debug, Parser)]
#[command(name = "santa-assign")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Admin password
    #[arg(short, long)]
    pub password: String,

    /// Skip sending email notifications
    #[arg(long)]
    pub skip_email: bool,

    /// Regenerate without asking when assignments already exist
    #[arg(short, long)]
    pub yes: bool,

    /// Path to the SQLite database
    #[arg(long, env = "SANTA_DB_PATH", default_value = "santa.db", value_name = "FILE")]
    pub db: PathBuf,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter for the chosen verbosity. Quiet by default so the
    /// human-readable report isn't drowned out.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "santa_core=debug,santa_db=debug,santa_mail=debug",
            _ => "trace",
        }
    }
}

/// Ask a yes/no question; only a literal "yes" counts.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{question} (yes/no): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
