use crate::domain::model::BreakdownLine;
use crate::domain::ports::ResultView;
use std::sync::{Mutex, MutexGuard};

/// Snapshot of every display region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub results_visible: bool,
    pub final_price: Option<String>,
    pub breakdown: Vec<BreakdownLine>,
    pub alerts: Vec<String>,
}

/// Keeps display state in memory, for embedding and for tests.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<ViewState>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResultView for MemoryView {
    fn show_results(&self) {
        self.lock().results_visible = true;
    }

    fn set_final_price(&self, text: &str) {
        self.lock().final_price = Some(text.to_string());
    }

    fn set_breakdown(&self, lines: &[BreakdownLine]) {
        self.lock().breakdown = lines.to_vec();
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}

pub fn format_breakdown_line(line: &BreakdownLine) -> String {
    if line.value.is_empty() {
        format!("  {}", line.label)
    } else {
        format!("  {:<40} {}", line.label, line.value)
    }
}

/// Prints results to stdout and notifications to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalView;

impl ResultView for TerminalView {
    fn show_results(&self) {
        println!();
    }

    fn set_final_price(&self, text: &str) {
        println!("💰 Minimum price: {} /kg", text);
    }

    fn set_breakdown(&self, lines: &[BreakdownLine]) {
        for line in lines {
            println!("{}", format_breakdown_line(line));
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}
