use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::core::models::entry::{DisplayEntry, EditorView};

static VERBOSE: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Configure output verbosity from the global CLI flags.
pub fn configure(verbose: bool, quiet: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a success message.
pub fn success(msg: &str) {
    if !quiet() {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !quiet() {
        println!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if !quiet() {
        println!("\n{}", msg.bold());
    }
}

/// Print a dimmed detail line, only in verbose mode.
pub fn detail(msg: &str) {
    if VERBOSE.load(Ordering::Relaxed) && !quiet() {
        println!("    {}", msg.dimmed());
    }
}

/// Start a spinner for a long-running step. Hidden in quiet mode.
pub fn spinner(msg: &str) -> ProgressBar {
    if quiet() {
        return ProgressBar::hidden();
    }
    let sp = ProgressBar::new_spinner();
    sp.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    sp.set_message(msg.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    sp
}

/// Stop a spinner and replace it with a success line.
pub fn finish_spinner(sp: ProgressBar, msg: &str) {
    sp.finish_and_clear();
    success(msg);
}

/// Render the editor view as a numbered table.
pub fn render_view(view: &EditorView) {
    if quiet() {
        return;
    }

    println!();
    for (index, row) in view.entries.iter().enumerate() {
        println!("  {:>3}  {}", index.to_string().dimmed(), format_row(row));
        if let Some(message) = &row.message {
            println!("       {} {}", "⚠".yellow(), message.yellow());
        }
    }
    println!();

    let submit = if view.can_submit {
        "ready".green()
    } else {
        "nothing to submit".dimmed()
    };
    let discard = if view.can_discard {
        "pending edits".yellow()
    } else {
        "clean".dimmed()
    };
    println!("  submit: {submit}   draft: {discard}");
}

fn format_row(row: &DisplayEntry) -> String {
    let entry = &row.entry;
    if entry.is_completely_empty() {
        return "(new row)".dimmed().to_string();
    }

    let marker = match row.present {
        Some(true) => "●".green(),
        Some(false) => "●".red(),
        None => "○".dimmed(),
    };
    let required = if entry.required {
        format!(" {}", "*".yellow())
    } else {
        String::new()
    };
    let value = if entry.encrypted {
        "•••••• (encrypted)".dimmed().to_string()
    } else if entry.value.is_empty() {
        "(empty)".dimmed().to_string()
    } else {
        entry.value.clone()
    };

    format!("{marker} {}{required} = {value}", entry.key.bold())
}
