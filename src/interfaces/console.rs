use crate::domain::ports::{PaymentView, RetryAction};
use crate::domain::result::TerminalOutcome;
use std::fmt;
use std::io::Write;
use tracing::warn;

/// View printing one line per command to a writer, typically stdout.
///
/// A failed write is logged and otherwise ignored; the flow must not depend
/// on the console.
pub struct ConsoleView<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            warn!(error = %e, "failed to write view command");
        }
    }
}

impl<W: Write + Send> PaymentView for ConsoleView<W> {
    fn show_progress(&mut self) {
        self.line(format_args!("progress"));
    }

    fn show_retry_prompt(&mut self, action: RetryAction, message: &str) {
        self.line(format_args!("retry-prompt: {action:?}: {message}"));
    }

    fn show_warning(&mut self, message: &str) {
        self.line(format_args!("warning: {message}"));
    }

    fn emit_terminal(&mut self, outcome: &TerminalOutcome) {
        let code = serde_json::to_value(outcome.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        self.line(format_args!(
            "terminal: {code}: {}",
            outcome.message.as_deref().unwrap_or("")
        ));
        match serde_json::to_string(&outcome.result) {
            Ok(json) => self.line(format_args!("result: {json}")),
            Err(e) => warn!(error = %e, "failed to serialize payment result"),
        }
    }
}
