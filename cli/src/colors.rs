use colored::*;
use recordshelf_core::RefreshStatus;

pub struct ColorScheme;

impl ColorScheme {
    pub fn new(use_colors: bool) -> Self {
        if !use_colors {
            colored::control::set_override(false);
        }
        Self
    }

    pub fn album(&self, text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn success(&self, text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(&self, text: &str) -> ColoredString {
        text.red()
    }

    pub fn skipped(&self, text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn number(&self, text: &str) -> ColoredString {
        text.green()
    }

    pub fn stats(&self, text: &str) -> ColoredString {
        text.blue()
    }

    pub fn status(&self, status: RefreshStatus) -> ColoredString {
        let label = status.as_str();
        match status {
            RefreshStatus::Downloaded => self.success(label),
            RefreshStatus::Skipped => self.skipped(label),
            RefreshStatus::AlreadyCached | RefreshStatus::UpdatedRefs => label.normal(),
        }
    }
}
