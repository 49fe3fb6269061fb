use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::screens::Alert;

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let stdout_tty = std::io::stdout().is_terminal();
    let stderr_tty = std::io::stderr().is_terminal();

    let table_color = stdout_tty
        && flags.format == OutputFormat::Table
        && !flags.quiet
        && std::env::var_os("NO_COLOR").is_none();

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    let _ = UI_PREFS.set(UiPrefs {
        table_color,
        progress: stderr_tty && !flags.quiet,
        term_width,
    });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

/// Show an alert on stderr as `title: message`.
pub fn alert(alert: &Alert) {
    eprintln!("{}", format_alert(alert));
}

#[must_use]
pub fn format_alert(alert: &Alert) -> String {
    render_alert(alert, prefs().table_color)
}

fn render_alert(alert: &Alert, color: bool) -> String {
    if color {
        let code = if alert.is_failure() { "31" } else { "32" };
        format!("\u{1b}[{code}m{}\u{1b}[0m: {}", alert.title, alert.message)
    } else {
        format!("{}: {}", alert.title, alert.message)
    }
}
