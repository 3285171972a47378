mod config;
mod session;

use std::io::{self, BufRead};
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::EngineConfig;
use session::Session;

fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn main() {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match config_path() {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                error!(%e, "could not load config");
                std::process::exit(2);
            }
        },
        None => EngineConfig::default(),
    };

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            error!(%e, "could not start engine");
            std::process::exit(2);
        }
    };

    // UCI engines communicate via stdin/stdout.
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match session.handle(line.trim(), &mut stdout) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!(%e, "stdout closed");
                break;
            }
        }
    }
}
