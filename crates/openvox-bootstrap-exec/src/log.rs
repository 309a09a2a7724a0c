use std::cell::RefCell;
use std::fmt::Display;
use std::io::{IsTerminal, Write};
use std::rc::Rc;

use anstyle::{AnsiColor, Effects, Style};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Info => Style::new().fg_color(Some(AnsiColor::BrightGreen.into())),
            Self::Error => Style::new()
                .fg_color(Some(AnsiColor::BrightRed.into()))
                .effects(Effects::BOLD),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    Plain,
    Rich,
}

impl LogStyle {
    /// Rich when stderr is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
            Self::Rich
        } else {
            Self::Plain
        }
    }
}

/// One recorded log event or chunk of command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LogEntry {
    Event {
        timestamp: String,
        level: Level,
        message: String,
    },
    Output(String),
}

/// Shared in-memory log, readable after the logger has been handed off.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl LogBuffer {
    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Messages logged at `level`, without timestamps.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Event {
                    level: entry_level,
                    message,
                    ..
                } if *entry_level == level => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Renders the log as it would appear on a console, with every timestamp
    /// replaced by `timestamp`.
    pub fn transcript(&self, timestamp: &str) -> String {
        let mut rendered = String::new();
        for entry in self.entries.borrow().iter() {
            match entry {
                LogEntry::Event { level, message, .. } => {
                    rendered.push_str(&render_event(LogStyle::Plain, timestamp, *level, message));
                    rendered.push('\n');
                }
                LogEntry::Output(text) => {
                    if let Some(text) = render_output(text) {
                        rendered.push_str(&text);
                    }
                }
            }
        }
        rendered
    }

    fn push(&self, entry: LogEntry) {
        self.entries.borrow_mut().push(entry);
    }
}

#[derive(Debug, Clone)]
enum Sink {
    Stderr,
    Memory(LogBuffer),
}

/// Timestamped, leveled log lines: `<timestamp> [INFO]: <message>`.
#[derive(Debug, Clone)]
pub struct Logger {
    sink: Sink,
    style: LogStyle,
}

impl Logger {
    /// Every line and all command output go to stderr, leaving stdout to the
    /// caller's result document.
    pub fn stderr(style: LogStyle) -> Self {
        Self {
            sink: Sink::Stderr,
            style,
        }
    }

    pub fn memory() -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        let logger = Self {
            sink: Sink::Memory(buffer.clone()),
            style: LogStyle::Plain,
        };
        (logger, buffer)
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.event(Level::Info, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.event(Level::Error, message.as_ref());
    }

    /// Reports a freshly derived value: `Assigned <name>=<value>`.
    pub fn assigned(&self, name: &str, value: impl Display) {
        self.info(format!("Assigned {name}={value}"));
    }

    /// Logs `err` at error level and hands it back to be returned.
    pub fn fatal<E: Display>(&self, err: E) -> E {
        self.error(err.to_string());
        err
    }

    /// Passes captured command output through unchanged.
    pub fn output(&self, text: &str) {
        match &self.sink {
            Sink::Stderr => {
                if let Some(text) = render_output(text) {
                    let mut stderr = std::io::stderr().lock();
                    let _ = stderr.write_all(text.as_bytes());
                    let _ = stderr.flush();
                }
            }
            Sink::Memory(buffer) => buffer.push(LogEntry::Output(text.to_string())),
        }
    }

    fn event(&self, level: Level, message: &str) {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        match &self.sink {
            Sink::Stderr => {
                eprintln!("{}", render_event(self.style, &timestamp, level, message));
            }
            Sink::Memory(buffer) => buffer.push(LogEntry::Event {
                timestamp,
                level,
                message: message.to_string(),
            }),
        }
    }
}

fn render_event(style: LogStyle, timestamp: &str, level: Level, message: &str) -> String {
    let tag = format!("[{}]", level.tag());
    let tag = match style {
        LogStyle::Plain => tag,
        LogStyle::Rich => colorize(level.style(), &tag),
    };
    format!("{timestamp} {tag}: {message}")
}

/// Command output is shown with exactly one trailing newline; empty output
/// produces nothing.
fn render_output(text: &str) -> Option<String> {
    let trimmed = text.trim_end_matches('\n');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("{trimmed}\n"))
    }
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
