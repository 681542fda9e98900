//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use selection_commerce::pricing::ProfitVerdict;
use selection_commerce::Money;

/// Console printer shared by every command.
///
/// In JSON mode only `json` and `error` write anything, so stdout stays
/// machine-readable.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn human(&self) -> bool {
        !self.json
    }

    pub fn info(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("ℹ").blue(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    /// Warnings go to stderr so piped tables stay clean.
    pub fn warn(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && self.human() {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if self.human() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(e) => self.error(&format!("failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Print one row of a fixed-width table; `widths` pads each column.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if !self.human() {
            return;
        }
        let cells: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(cell, &width)| format!("{:<width$}", cell))
            .collect();
        println!("  {}", cells.join("  "));
    }

    /// A progress bar, hidden in JSON mode.
    pub fn progress(&self, len: u64, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {bar:30.cyan/blue} {pos}/{len} steps {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(bar_style);
        bar.set_message(msg.to_string());
        bar
    }
}

/// Coloured label for a profitability verdict.
pub fn verdict_badge(verdict: &ProfitVerdict) -> String {
    match verdict {
        ProfitVerdict::Profitable(_) => style("profitable").green().to_string(),
        ProfitVerdict::Unprofitable(_) => style("unprofitable").red().to_string(),
        ProfitVerdict::InsufficientData => style("no data").yellow().to_string(),
        ProfitVerdict::Disabled => style("disabled").dim().to_string(),
    }
}

/// Money or a dash.
pub fn format_money(money: Option<Money>) -> String {
    money.map(|m| m.display()).unwrap_or_else(|| "-".to_string())
}

/// Shorten a title to `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use selection_commerce::Currency;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("kettle", 10), "kettle");
        assert_eq!(truncate("electric kettle", 6), "elect…");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(None), "-");
        assert_eq!(
            format_money(Some(Money::new(5_300, Currency::CNY))),
            Money::new(5_300, Currency::CNY).display()
        );
    }
}
