//! Typing indicator shown while a reply is pending

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner that plays the "Typing..." line until the reply lands.
pub struct TypingIndicator {
    bar: ProgressBar,
}

impl TypingIndicator {
    pub fn start() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message("Typing...");
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Stop the spinner and erase its line.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
    }
}
