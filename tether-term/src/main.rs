//! Tether
//!
//! Headless terminal front-end. Mounts a terminal session in a virtual
//! container, reports grid sizes to the peer as JSON lines on stdout and
//! reads container events from a script.

mod config;
mod headless;

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use clap::Parser;
use config::{CliArgs, FileConfig};
use headless::Runner;
use tether_core::{HeadlessContainer, PixelSize, Surface, ThemeRegistry};
use tether_session::{HostContext, JsonLinesTransport, Transport};

fn main() -> ExitCode {
    // Users can set RUST_LOG=info or RUST_LOG=debug for more verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let config = FileConfig::from_args(&args);
    if let Some(path) = config.path() {
        log::debug!("Config file: {}", path.display());
    }

    let mut registry = ThemeRegistry::builtin();
    match config.register_themes(&mut registry) {
        Ok(0) => {}
        Ok(count) => log::debug!("Loaded {} user theme(s)", count),
        Err(e) => log::warn!("Skipping user themes: {}", e),
    }

    if args.list_themes {
        for name in registry.names() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    let container = HeadlessContainer::new(PixelSize::new(args.width, args.height));
    let mut host = HostContext::new(Some(container), registry);
    host.set_reservation(args.reservation());

    let save_store = config.clone();
    host.set_save_config_handler(move |options| save_store.save(options));
    host.set_close_config_handler(|| log::info!("Configuration panel closed"));

    let mut runner = Runner::new(host, config, || {
        Box::new(JsonLinesTransport::new(io::stdout())) as Box<dyn Transport>
    });
    if !runner.start() {
        eprintln!("Failed to start terminal session");
        return ExitCode::FAILURE;
    }

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => runner.run(BufReader::new(file)),
            Err(e) => {
                eprintln!("Cannot open script {}: {}", path.display(), e);
                runner.finish();
                return ExitCode::FAILURE;
            }
        },
        None => runner.run(io::stdin().lock()),
    };

    let summary = runner.summary();
    if let Some(terminal) = runner.host().terminal() {
        log::debug!("Final geometry {:?}", terminal.geometry());
    }
    runner.finish();

    match result {
        Ok(summary) => {
            log::info!(
                "{} command(s), {} resize(s) sent, {} session(s), {} failure(s)",
                summary.commands,
                summary.resizes_sent,
                summary.sessions_started,
                summary.failures
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("Stopped after {} command(s)", summary.commands);
            eprintln!("Script error: {}", e);
            ExitCode::FAILURE
        }
    }
}
