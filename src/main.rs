//! Entry point for the **smarttab** daemon.
//!
//! Loads configuration, reconciles the stored layout, spawns the Unix-socket
//! [`CommandSource`](smarttab::traits::CommandSource) on a background thread
//! and processes incoming commands on the main thread, which is the single
//! owner of all launcher state.

use clap::Parser;
use log::{error, info};
use smarttab::command::Response;
use smarttab::config::Config;
use smarttab::ipc::listener::UnixSocketListener;
use smarttab::launcher::Launcher;
use smarttab::manager::ConfigManager;
use smarttab::store::{JsonFileStore, MemoryStore};
use smarttab::template::Template;
use smarttab::traits::{CommandSource, PreferenceStore, Request};
use std::path::PathBuf;
use std::sync::mpsc;

/// Keyboard-grid launcher daemon.
#[derive(Debug, Parser)]
#[command(name = "smarttab", version, about)]
struct Cli {
    /// Configuration file (default: <config dir>/smarttab/config.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command socket path (overrides the config file).
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Keep preferences in memory only; nothing is written to disk.
    #[arg(long)]
    ephemeral: bool,
}

/// Try to load the config, falling back to compiled-in defaults.
fn load_config(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(Config::default_path);
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config);
    let socket = cli
        .socket
        .or_else(|| config.socket_path.clone())
        .unwrap_or_else(UnixSocketListener::default_path);

    if cli.ephemeral {
        info!("ephemeral mode, preferences are not persisted");
        run_daemon(MemoryStore::new(), config, socket);
    } else {
        let path = config
            .store
            .path
            .clone()
            .unwrap_or_else(JsonFileStore::default_path);
        match JsonFileStore::open(&path) {
            Ok(store) => {
                info!("preferences at {}", store.path().display());
                run_daemon(store, config, socket);
            }
            Err(e) => {
                error!("failed to open preferences: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_daemon<S: PreferenceStore>(store: S, config: Config, socket: PathBuf) {
    let template = Template::builtin_for_current_user();
    let manager = match ConfigManager::load(store, &template) {
        Ok(m) => m,
        Err(e) => {
            error!("failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut launcher = Launcher::new(manager, config.launcher);

    let (tx, rx) = mpsc::channel::<Request>();
    spawn_command_source(tx, socket);

    info!("smarttab running");
    for request in rx {
        let response = match launcher.handle(request.command) {
            Ok(r) => r,
            Err(e) => {
                error!("command error: {}", e);
                Response::Error(e.to_string())
            }
        };
        // The client may have hung up; nothing to do about it.
        let _ = request.reply.send(response);
    }
    info!("command source closed, exiting");
}

//  Helpers

fn spawn_command_source(tx: mpsc::Sender<Request>, path: PathBuf) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
