//! Entry point for the **snapgrab** daemon.
//!
//! Runs the grab controllers against the headless backend.  Input events
//! arrive over the Unix socket on a background thread and are processed
//! strictly in order on the main thread.
//!
//! ```text
//! snapgrab [--config PATH] [--socket PATH]
//! ```

use log::{debug, error, info};
use snapgrab::config::Config;
use snapgrab::event::InputEvent;
use snapgrab::headless::HeadlessDesktop;
use snapgrab::ipc::listener::UnixSocketListener;
use snapgrab::signals::{Dispatcher, Signal};
use snapgrab::traits::{EventSource, NoAnimation};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Default socket path for the event listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("snapgrab.sock")
}

/// `$XDG_CONFIG_HOME/snapgrab/config.json`.
fn default_config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("snapgrab").join("config.json")
}

/// Load the config, falling back to compiled-in defaults.
fn load_config(path: &Path) -> Config {
    match Config::load(path) {
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

struct Args {
    config: PathBuf,
    socket: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: default_config_path(),
        socket: default_socket_path(),
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let slot = match arg.as_str() {
            "--config" => &mut args.config,
            "--socket" => &mut args.socket,
            other => return Err(format!("unknown argument {:?}", other)),
        };
        *slot = it
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| format!("{} needs a path", arg))?;
    }
    Ok(args)
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("usage: snapgrab [--config PATH] [--socket PATH]");
            std::process::exit(2);
        }
    };

    let config = load_config(&args.config);
    let desktop = HeadlessDesktop::new(&config.headless);
    let mut dispatcher = Dispatcher::new(desktop.clone(), NoAnimation, config);

    let (signal_tx, signal_rx) = mpsc::channel::<Signal>();
    dispatcher.set_listener(signal_tx);

    let (event_tx, event_rx) = mpsc::channel::<InputEvent>();
    spawn_event_sources(event_tx, args.socket);

    info!("snapgrab running");
    for event in event_rx {
        if event == InputEvent::ReloadConfig {
            dispatcher.set_config(load_config(&args.config));
            continue;
        }
        for signal in desktop.apply(&event) {
            dispatcher.emit(signal);
        }
        dispatcher.handle(&event);
        for signal in signal_rx.try_iter() {
            debug!("delivered {:?}", signal);
        }
    }
    info!("all event sources closed, exiting");
}

fn spawn_event_sources(tx: mpsc::Sender<InputEvent>, socket: PathBuf) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&socket);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
