// Forbid unwrap() in production code to prevent panics from corrupt data.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::io::{BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use treefs::command::USAGE;
use treefs::config::ShellConfig;
use treefs::types::{Directory, EntryKind};
use treefs::{Outcome, Session, image};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "treefs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment variables
    let config = match ShellConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: image_path={}, max_content_bytes={}, order={}",
        config.image_path.display(),
        config.max_content_bytes,
        config.order.min_degree()
    );

    let root = match image::load(&config.image_path, config.order) {
        Ok(Some(root)) => root,
        Ok(None) => {
            tracing::info!("starting with an empty filesystem");
            Directory::with_order(config.order)
        }
        Err(e) => {
            tracing::error!("Failed to load image {}: {e}", config.image_path.display());
            std::process::exit(1);
        }
    };

    let mut session = Session::new(root, config.session_options());
    if let Err(e) = run(&mut session) {
        tracing::error!("Terminal error: {e}");
    }

    let root = session.into_root();
    match image::save(&root, &config.image_path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed to save image {}: {e}", config.image_path.display());
            ExitCode::FAILURE
        }
    }
}

/// Read, execute and print until `exit` or end of input.
fn run(session: &mut Session) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    let mut line = String::new();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            tracing::debug!("end of input");
            return Ok(());
        }

        match session.execute_line(&line) {
            Ok(Outcome::Exit) => return Ok(()),
            Ok(outcome) => render(&mut stdout, &outcome)?,
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }
}

fn render(out: &mut impl Write, outcome: &Outcome) -> std::io::Result<()> {
    match outcome {
        Outcome::Nothing | Outcome::Exit => Ok(()),
        Outcome::Listing(entries) => {
            for entry in entries {
                match entry.kind {
                    EntryKind::Directory => writeln!(out, "{}/", entry.name)?,
                    EntryKind::File => writeln!(out, "{}", entry.name)?,
                }
            }
            Ok(())
        }
        Outcome::Created { name, kind } => writeln!(out, "created {kind} {name}"),
        Outcome::Removed { name, kind } => writeln!(out, "removed {kind} {name}"),
        Outcome::ChangedDirectory(path) | Outcome::WorkingDirectory(path) => {
            writeln!(out, "{path}")
        }
        Outcome::Content(bytes) => writeln!(out, "{}", String::from_utf8_lossy(bytes)),
        Outcome::Help => writeln!(out, "{USAGE}"),
    }
}
