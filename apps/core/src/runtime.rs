use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use crate::clipboard::{ClipboardWatcher, SystemClipboard, DEFAULT_POLL_INTERVAL};
use crate::config;
use crate::history_store::SharedHistory;
use crate::hotkey::{self, HotkeyListener, DEFAULT_HOTKEY};
use crate::logging;
use crate::session::{run_event_loop, PopupSession, SessionEvent};

const MIN_POLL_MS: u64 = 50;
const PREVIEW_CHARS: usize = 96;

pub const USAGE: &str = "usage: clip-recall [--settings <path>] [--poll-ms <n>] [--hotkey <combo>]

The hotkey (default Alt+Q) toggles the popup. Type a query and press Enter to filter the history.
  \"exact phrase\"   all quoted phrases must appear
  a or b           either group matches
  -term            entries containing term are hidden
Commands: :up :down :enter :delword :show :esc :quit";

#[derive(Debug)]
pub enum RuntimeError {
    Cli(String),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli(error) => write!(f, "invalid arguments: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub settings_path: Option<PathBuf>,
    pub poll_interval: Duration,
    pub hotkey: String,
    pub show_help: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            settings_path: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            hotkey: DEFAULT_HOTKEY.to_string(),
            show_help: false,
        }
    }
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, RuntimeError> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => {
                let value = iter
                    .next()
                    .ok_or_else(|| RuntimeError::Cli("--settings requires a path".to_string()))?;
                options.settings_path = Some(PathBuf::from(value));
            }
            "--poll-ms" => {
                let value = iter
                    .next()
                    .ok_or_else(|| RuntimeError::Cli("--poll-ms requires a value".to_string()))?;
                let millis = value.parse::<u64>().map_err(|_| {
                    RuntimeError::Cli(format!("--poll-ms expects a number, got '{value}'"))
                })?;
                if millis < MIN_POLL_MS {
                    return Err(RuntimeError::Cli(format!(
                        "--poll-ms must be at least {MIN_POLL_MS}"
                    )));
                }
                options.poll_interval = Duration::from_millis(millis);
            }
            "--hotkey" => {
                let value = iter
                    .next()
                    .ok_or_else(|| RuntimeError::Cli("--hotkey requires a combination".to_string()))?;
                hotkey::parse_hotkey(value)
                    .map_err(|error| RuntimeError::Cli(error.to_string()))?;
                options.hotkey = value.clone();
            }
            "-h" | "--help" => options.show_help = true,
            other => return Err(RuntimeError::Cli(format!("unknown argument '{other}'"))),
        }
    }

    Ok(options)
}

pub fn parse_console_line(line: &str) -> SessionEvent {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed.trim() {
        ":up" => SessionEvent::MoveSelection(-1),
        ":down" => SessionEvent::MoveSelection(1),
        ":enter" => SessionEvent::Submit,
        ":show" => SessionEvent::Hotkey,
        ":esc" => SessionEvent::Escape,
        ":delword" => SessionEvent::DeleteWordBackward,
        ":quit" | ":q" => SessionEvent::Shutdown,
        _ => SessionEvent::QueryChanged(trimmed.to_string()),
    }
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    if options.show_help {
        println!("{USAGE}");
        return Ok(());
    }

    if let Err(error) = logging::init() {
        eprintln!("[clip-recall] logging disabled: {error}");
    }

    let cfg = config::load(options.settings_path.as_deref());
    let history = SharedHistory::with_capacity(cfg.capacity());
    println!(
        "[clip-recall] startup max_entries={} settings={} poll_ms={}",
        history.capacity(),
        cfg.config_path.display(),
        options.poll_interval.as_millis(),
    );
    logging::info(&format!(
        "startup max_entries={} settings={}",
        history.capacity(),
        cfg.config_path.display()
    ));

    let (sender, receiver) = mpsc::channel::<SessionEvent>();

    let clipboard_sender = sender.clone();
    let watcher =
        ClipboardWatcher::new(SystemClipboard).spawn(options.poll_interval, move |text| {
            clipboard_sender
                .send(SessionEvent::ClipboardText(text))
                .is_ok()
        });

    let hotkey_listener = start_hotkey_listener(&options.hotkey, sender.clone());
    spawn_console_reader(sender)?;

    let mut session = PopupSession::new(history, SystemClipboard);
    run_event_loop(receiver, &mut session, |session| {
        print!("{}", render_results(session.results(), session.selected_index()));
    });

    if let Some(listener) = hotkey_listener {
        listener.stop();
    }
    watcher.stop();
    logging::info("shutdown");
    println!("[clip-recall] bye");
    Ok(())
}

fn start_hotkey_listener(
    raw: &str,
    sender: Sender<SessionEvent>,
) -> Option<HotkeyListener> {
    let result = hotkey::parse_hotkey(raw).and_then(|combo| {
        let label = combo.to_string();
        hotkey::spawn_listener(combo, move || sender.send(SessionEvent::Hotkey).is_ok())
            .map(|listener| (listener, label))
    });

    match result {
        Ok((listener, label)) => {
            println!("[clip-recall] hotkey={label}");
            logging::info(&format!("hotkey registered: {label}"));
            Some(listener)
        }
        Err(error) => {
            println!("[clip-recall] {error}; use :show to toggle the popup");
            logging::warn(&format!("hotkey unavailable: {error}"));
            None
        }
    }
}

fn spawn_console_reader(sender: Sender<SessionEvent>) -> Result<(), RuntimeError> {
    std::thread::Builder::new()
        .name("clip-recall-console".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if sender.send(parse_console_line(&line)).is_err() {
                    return;
                }
            }
            let _ = sender.send(SessionEvent::Shutdown);
        })?;
    Ok(())
}

pub fn render_results(results: &[String], selected: Option<usize>) -> String {
    if results.is_empty() {
        return "  (no matches)\n".to_string();
    }

    let mut out = String::new();
    for (index, entry) in results.iter().enumerate() {
        let marker = if Some(index) == selected { '>' } else { ' ' };
        let preview = preview_text(entry, PREVIEW_CHARS);
        out.push_str(&format!("{marker} {:>3}  {preview}\n", index + 1));
    }
    out
}

fn preview_text(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\r', '\n'], " ");
    let trimmed = single_line.trim();
    let mut out: String = trimmed.chars().take(max_chars).collect();
    if trimmed.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
