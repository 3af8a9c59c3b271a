//! Colored terminal output for progress, results and errors.
//!
//! Colors are applied only when the stream is a terminal and `NO_COLOR`
//! is unset or empty.

use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

/// Width of panel borders, in columns.
const PANEL_WIDTH: usize = 60;

fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty())
}

/// Whether stdout should receive ANSI colors.
pub fn stdout_styled() -> bool {
    !no_color() && std::io::stdout().is_terminal()
}

fn stderr_styled() -> bool {
    !no_color() && std::io::stderr().is_terminal()
}

fn paint(text: &str, color: Color, styled: bool) -> String {
    if styled {
        text.with(color).to_string()
    } else {
        text.to_string()
    }
}

/// Progress step, e.g. "🔍 Checking for uncommitted changes...".
pub fn step(message: &str) {
    println!("{}", paint(message, Color::Cyan, stdout_styled()));
}

/// Neutral notice such as "nothing to commit".
pub fn notice(message: &str) {
    println!("{}", paint(message, Color::Yellow, stdout_styled()));
}

pub fn success(message: &str) {
    println!("{}", paint(message, Color::Green, stdout_styled()));
}

/// The single error line printed before a non-zero exit.
pub fn error(message: &str) {
    eprintln!("{}", paint(&format!("❌ Error: {message}"), Color::Red, stderr_styled()));
}

pub fn hint(message: &str) {
    eprintln!("{}", paint(message, Color::Yellow, stderr_styled()));
}

/// Print `body` inside a titled frame.
pub fn panel(title: &str, body: &str, color: Color) {
    print!("{}", render_panel(title, body, color, stdout_styled()));
}

fn render_panel(title: &str, body: &str, color: Color, styled: bool) -> String {
    let title_width = title.chars().count() + 4;
    let top = format!(
        "╭─ {title} {}",
        "─".repeat(PANEL_WIDTH.saturating_sub(title_width))
    );
    let bottom = format!("╰{}", "─".repeat(PANEL_WIDTH - 1));
    let bar = paint("│", color, styled);

    let mut out = String::new();
    out.push_str(&paint(&top, color, styled));
    out.push('\n');
    for line in body.trim_end_matches('\n').lines() {
        out.push_str(&bar);
        out.push(' ');
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&paint(&bottom, color, styled));
    out.push_str("\n\n");
    out
}
