use clap::Parser;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vphy_config::{toml_config, SharedConfig};
use vphy_core::debug;
use vphy_l1::{medium_channel, DiscardMedium, L1Engine};

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "GSM virtual PHY",
    long_about = "Runs a virtual Layer 1 for a simulated GSM mobile station using the provided TOML configuration"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with socket/cell parameters")]
    config: String,

    /// Override the L1CTL control socket path from the config file
    #[arg(short = 's', long = "socket")]
    socket_path: Option<String>,
}

fn main() {
    eprintln!("gsm-virtphy - virtual Layer 1 for GSM mobile stations");
    eprintln!("    Wouter Bokslag / Midnight Blue");
    eprintln!(" -> https://midnightblue.nl\n");

    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let cfg = match args.socket_path {
        Some(path) => {
            let mut raw = (*cfg.config()).clone();
            raw.l1ctl.socket_path = path;
            SharedConfig::from_config(raw)
        }
        None => cfg,
    };
    let _log_guard = debug::setup_logging_default(cfg.config().debug_log.clone());

    // No medium peer is wired up by this binary; bursts are logged and
    // dropped, and the receive channel stays idle.
    let (_medium_tx, medium_rx) = medium_channel();
    let mut engine = match L1Engine::new(cfg, Box::new(DiscardMedium), medium_rx) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("startup failed: {}", e);
            std::process::exit(1);
        }
    };

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("failed to set Ctrl+C handler");

    engine.run(Some(running));
    // engine drops here -> the control socket file is removed
}
