use crate::support::ts_ms_to_date;
use hop_core::age::{self, Age};
use hop_storage::BranchRow;
use std::io::{IsTerminal, Write};

// ANSI 256-color palette, written out by hand so the terminal layer stays
// dependency-free. \x1b[38;5;NNNm selects foreground, \x1b[1m bold,
// \x1b[0m resets.
const GREEN: u8 = 34;
const RED: u8 = 196;
const YELLOW: u8 = 220;
const BLUE: u8 = 39;
const CYAN: u8 = 51;
const DIM: u8 = 242;

/// Console rendering with quiet/verbose switches. Errors always reach
/// stderr, even in quiet mode; everything else respects `quiet`.
#[derive(Debug)]
pub struct Output {
    quiet: bool,
    verbose: bool,
    color: bool,
}

impl Output {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let color =
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            quiet,
            verbose,
            color,
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(&format!("✓ {message}"), GREEN, false));
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(&format!("✗ {message}"), RED, false));
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(&format!("⚠ {message}"), YELLOW, false));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(&format!("ℹ {message}"), BLUE, false));
        }
    }

    pub fn debug(&self, message: &str) {
        if self.verbose {
            println!("{}", self.paint(message, DIM, false));
        }
    }

    pub fn heading(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!();
        println!("{}", self.paint(message, CYAN, true));
        println!(
            "{}",
            self.paint(&"─".repeat(message.chars().count()), DIM, false)
        );
    }

    /// Ordered branch table: index, name, relative last-visit time. The
    /// current branch gets an arrow marker and bold name.
    pub fn branch_list(&self, branches: &[BranchRow], current: Option<&str>, now_ms: i64) {
        if self.quiet || branches.is_empty() {
            return;
        }

        self.heading("Tracked Branches");

        let index_width = branches.len().to_string().len();
        let name_width = branches
            .iter()
            .map(|branch| branch.name.chars().count())
            .max()
            .unwrap_or(0);

        for (slot, branch) in branches.iter().enumerate() {
            let is_current = Some(branch.name.as_str()) == current;
            let marker = if is_current {
                self.paint("→", GREEN, false)
            } else {
                " ".to_string()
            };

            let mut line = String::new();
            line.push_str(&marker);
            line.push(' ');
            line.push_str(&format!("{:>index_width$}", slot + 1));
            line.push_str("  ");

            let styled_name = if is_current {
                self.paint(&branch.name, GREEN, true)
            } else {
                branch.name.clone()
            };
            line.push_str(&styled_name);
            for _ in 0..name_width.saturating_sub(branch.name.chars().count()) {
                line.push(' ');
            }

            line.push_str("  ");
            line.push_str(&self.paint(
                &format_age(now_ms, branch.last_visited_at_ms),
                DIM,
                false,
            ));
            println!("{line}");
        }
    }

    /// y/N confirmation on stdin. Quiet mode auto-confirms, matching the
    /// behavior scripts rely on.
    pub fn prompt(&self, message: &str) -> bool {
        if self.quiet {
            return true;
        }
        print!("{} ", self.paint(&format!("{message} [y/N]"), YELLOW, false));
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

    fn paint(&self, text: &str, color: u8, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let mut out = String::new();
        out.push_str(&format!("\x1b[38;5;{color}m"));
        if bold {
            out.push_str("\x1b[1m");
        }
        out.push_str(text);
        out.push_str("\x1b[0m");
        out
    }
}

pub fn format_age(now_ms: i64, then_ms: i64) -> String {
    match age::classify(now_ms, then_ms) {
        Age::JustNow => "just now".to_string(),
        Age::Minutes(minutes) => format!("{minutes}m ago"),
        Age::Hours(hours) => format!("{hours}h ago"),
        Age::Days(days) => format!("{days}d ago"),
        Age::Older => ts_ms_to_date(then_ms),
    }
}
