//! `santa-assign` - trigger a Secret Santa draw from the terminal.

mod cli;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use santa_core::draw;
use santa_core::notify::notify_all;
use santa_core::{AdminAuth, AppConfig, AssignmentStore, AuthError, Generator, NotifyError};
use santa_db::Database;
use santa_mail::SmtpNotifier;

use crate::cli::{Cli, confirm};

fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    // Terminal sessions never leave the process, so no token secret is needed.
    let auth = AdminAuth::new(config.admin_passphrase.clone(), String::new());
    let session = match auth.authenticate(&cli.password) {
        Ok(session) => session,
        Err(AuthError::InvalidPassphrase) => {
            eprintln!("Error: Invalid password");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    debug!(path = %cli.db.display(), "Opening database");
    let db = Database::open(&cli.db)?;

    if !cli.yes && !db.load_all()?.is_empty() {
        let regenerate = confirm(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Assignments already exist. Do you want to regenerate?",
        )?;
        if !regenerate {
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    println!("Generating Secret Santa assignments...");
    let generator = Generator::new(config.max_draw_attempts);
    let outcome = match draw::execute(&session, &db, &db, &generator, &mut rand::rng()) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "Successfully generated assignments for {} participants!",
        outcome.assignments.len()
    );
    println!("\nAssignments:");
    println!("{}", "-".repeat(50));
    for (giver, giftee) in outcome.pairs() {
        println!("{giver} → {giftee}");
    }

    if cli.skip_email {
        println!("\nSkipping email notifications (--skip-email flag used)");
    } else {
        println!("\nSending email notifications...");
        match SmtpNotifier::new(&config.mail) {
            Err(NotifyError::NotConfigured) => {
                println!("Warning: Email configuration not set. Skipping email notifications.");
                println!("   Set SANTA_SENDER_EMAIL and SANTA_SENDER_PASSWORD in your .env file");
            }
            Err(e) => {
                println!("Warning: Could not set up email delivery: {e}");
            }
            Ok(notifier) => {
                let results = notify_all(&outcome.participants, &outcome.assignments, &notifier);
                for r in &results {
                    if r.success {
                        println!("  ✓ Sent to {} ({})", r.participant, r.email);
                    } else {
                        println!("  ✗ Failed to send to {}: {}", r.participant, r.message);
                    }
                }
                let sent = results.iter().filter(|r| r.success).count();
                println!("\nEmail summary: {} sent, {} failed", sent, results.len() - sent);
            }
        }
    }

    println!("\nAll done! Participants can now check their assignments on the website.");
    Ok(ExitCode::SUCCESS)
}
