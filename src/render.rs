use std::io::IsTerminal as _;

use askama::Template;
use miette::IntoDiagnostic as _;
use termimad::MadSkin;

const BAR_WIDTH: usize = 30;

/// Prints markdown through termimad on a terminal, raw otherwise.
pub fn print_markdown(markdown: &str) {
    if std::io::stdout().is_terminal() {
        let skin = MadSkin::default();
        skin.print_text(markdown);
    } else {
        println!("{markdown}");
    }
}

pub fn print_template<T: Template>(template: &T) -> miette::Result<()> {
    let markdown = template.render().into_diagnostic()?;
    print_markdown(&markdown);
    Ok(())
}

/// Escapes text for a markdown table cell so a `|` stays inside it.
pub fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Horizontal bar proportional to `value / max`.
pub fn bar(value: u64, max: u64) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }

    let filled = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

pub fn percent(value: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }

    ((value as f64 / total as f64) * 100.0).round() as u64
}
