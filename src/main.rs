//! Radial Menu daemon
//!
//! Drives the pie-menu core as a long-running process:
//! - loads the menu configuration and keeps its shortcuts bound
//! - accepts JSONL requests on stdin, answers on stdout
//! - opens configured menus when their global hotkey fires
//! - reloads and re-reconciles when the config file changes

use anyhow::Result;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use radial_menu::commands::{self, Request};
use radial_menu::config::MenuConfig;
use radial_menu::dispatcher::{Dispatcher, RequestError};
use radial_menu::hotkeys::GlobalBinder;
use radial_menu::session::SessionEvent;
use radial_menu::shortcuts::reconcile;

/// Everything the main loop reacts to, from any thread.
enum AppMessage {
    /// A request arrived on the control channel
    Request(Request),
    /// A bound global hotkey was pressed
    HotkeyPressed(u32),
    /// The configuration file changed on disk
    ConfigChanged,
}

/// Read JSONL requests from stdin. Lines that don't parse are answered
/// with the catch-all error code so callers always get a reply.
fn start_stdin_listener(tx: Sender<AppMessage>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-listener".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "error reading control channel");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Request>(&line) {
                    Ok(request) => {
                        if tx.send(AppMessage::Request(request)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(line = %line, "unparseable request line");
                        let error = RequestError::Unknown(format!("unrecognized request: {}", e));
                        println!("{}", commands::error_line(&error));
                    }
                }
            }
            debug!("control channel listener exiting");
        })
        .map(|_| ())
}

/// Forward pressed-hotkey events into the main loop.
fn start_hotkey_event_thread(tx: Sender<AppMessage>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("hotkey-events".to_string())
        .spawn(move || {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if event.state != HotKeyState::Pressed {
                    continue;
                }
                if tx.send(AppMessage::HotkeyPressed(event.id)).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
}

/// Watch the config directory; any change to it re-reads the file.
/// The watcher must stay alive, so it is returned to the caller.
fn watch_config(tx: Sender<AppMessage>) -> notify::Result<RecommendedWatcher> {
    let dir = MenuConfig::config_path()
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).ok();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
        match result {
            Ok(event)
                if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() =>
            {
                let _ = tx.send(AppMessage::ConfigChanged);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "config watch error"),
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Re-read the configuration and bring shortcut bindings in line.
fn reload(dispatcher: &mut Dispatcher, binder: &mut Option<GlobalBinder>) {
    let config = MenuConfig::load();
    info!(menus = config.menus.len(), "configuration reloaded");
    if let Some(binder) = binder.as_mut() {
        reconcile(binder, &config.desired_shortcuts());
    }
    dispatcher.set_config(config);
}

/// Open the menu bound to a pressed hotkey.
fn handle_hotkey(dispatcher: &mut Dispatcher, binder: &Option<GlobalBinder>, id: u32) {
    let Some(binder) = binder.as_ref() else {
        return;
    };
    let Some(shortcut) = binder.shortcut_for_id(id) else {
        debug!(id, "event for an unbound hotkey");
        return;
    };
    let Some(name) = dispatcher
        .config()
        .menu_for_shortcut(shortcut)
        .map(|menu| menu.name.clone())
    else {
        warn!(shortcut, "no configured menu for bound shortcut");
        return;
    };
    match dispatcher.show_menu(&name) {
        Ok(session_id) => info!(menu = %name, session_id, "menu opened by hotkey"),
        // Usually a second press while the menu is still open; the press
        // is dropped, not queued.
        Err(e) => warn!(menu = %name, error = %e, "hotkey open rejected"),
    }
}

/// Answer one control-channel request. Select/cancel reports and reloads
/// have no reply line.
fn handle_request(dispatcher: &mut Dispatcher, request: Request) -> Option<String> {
    let result = match request {
        Request::ShowMenu { name } => dispatcher.show_menu(&name),
        Request::PreviewMenu { name } => dispatcher.preview_menu(&name),
        Request::ShowCustomMenu { description } => dispatcher.show_custom_menu(&description),
        Request::PreviewCustomMenu { description } => dispatcher.preview_custom_menu(&description),
        Request::SelectItem { path } => {
            dispatcher.select_item(&path);
            return None;
        }
        Request::CancelMenu => {
            dispatcher.cancel_menu();
            return None;
        }
        Request::ReloadConfig => return None,
    };
    Some(match result {
        Ok(session_id) => commands::result_line(session_id),
        Err(e) => {
            warn!(error = %e, code = e.code(), "request rejected");
            commands::error_line(&e)
        }
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("radial-menu starting");

    // First run: write the default config so there is something to edit.
    if !MenuConfig::config_path().exists() {
        match MenuConfig::default().save() {
            Ok(()) => info!(path = %MenuConfig::config_path().display(), "wrote default menu configuration"),
            Err(e) => warn!(error = %e, "could not write default configuration"),
        }
    }
    let config = MenuConfig::load();
    info!(menus = config.menus.len(), "configuration loaded");

    let (tx, rx): (Sender<AppMessage>, Receiver<AppMessage>) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
    let mut dispatcher = Dispatcher::new(config, event_tx);

    // Hotkeys are best-effort: the control channel still works without a
    // usable display connection.
    let mut binder = match GlobalBinder::new() {
        Ok(binder) => Some(binder),
        Err(e) => {
            warn!(error = %e, "global hotkeys unavailable");
            None
        }
    };
    if let Some(binder) = binder.as_mut() {
        reconcile(binder, &dispatcher.config().desired_shortcuts());
    }

    if let Err(e) = start_stdin_listener(tx.clone()) {
        warn!(error = %e, "could not start control channel listener");
    }
    if let Err(e) = start_hotkey_event_thread(tx.clone()) {
        warn!(error = %e, "could not start hotkey event thread");
    }
    let _watcher = match watch_config(tx.clone()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "config watching unavailable");
            None
        }
    };
    drop(tx);

    // Main event loop - everything session-related happens on this thread.
    while let Ok(message) = rx.recv() {
        match message {
            AppMessage::Request(Request::ReloadConfig) | AppMessage::ConfigChanged => {
                reload(&mut dispatcher, &mut binder);
            }
            AppMessage::Request(request) => {
                if let Some(line) = handle_request(&mut dispatcher, request) {
                    println!("{}", line);
                }
            }
            AppMessage::HotkeyPressed(id) => {
                handle_hotkey(&mut dispatcher, &binder, id);
            }
        }

        // Session outcomes produced by the calls above; only ad-hoc
        // sessions are reported outward.
        while let Ok(event) = event_rx.try_recv() {
            if let Some(line) = commands::event_line(&event) {
                println!("{}", line);
            }
        }
    }

    info!("all event sources closed, exiting");
    Ok(())
}
