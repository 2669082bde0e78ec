use std::time::Duration;

/// End-of-run statistics, rendered for the chat notifier.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub duration: Duration,
    pub environment: String,
    pub failed_cases: Vec<String>,
}

// Cap the failed-case list so a bad run does not flood the chat group.
const MAX_LISTED_FAILURES: usize = 10;

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.passed) / f64::from(self.total) * 100.0
    }

    fn duration_text(&self) -> String {
        let secs = self.duration.as_secs();
        if secs >= 60 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}s", secs)
        }
    }

    pub fn title(&self) -> String {
        if self.all_passed() {
            "UI test run passed".to_string()
        } else {
            format!("UI test run failed ({} failed)", self.failed)
        }
    }

    pub fn render_markdown(&self) -> String {
        let mut text = format!(
            "### {}\n\n\
             - environment: {}\n\
             - total: {}\n\
             - passed: {}\n\
             - failed: {}\n\
             - skipped: {}\n\
             - pass rate: {:.1}%\n\
             - duration: {}\n",
            self.title(),
            self.environment,
            self.total,
            self.passed,
            self.failed,
            self.skipped,
            self.pass_rate(),
            self.duration_text(),
        );

        if !self.failed_cases.is_empty() {
            text.push_str("\n**Failed cases**\n");
            for case in self.failed_cases.iter().take(MAX_LISTED_FAILURES) {
                text.push_str(&format!("- {}\n", case));
            }
            if self.failed_cases.len() > MAX_LISTED_FAILURES {
                text.push_str(&format!(
                    "- ... and {} more\n",
                    self.failed_cases.len() - MAX_LISTED_FAILURES
                ));
            }
        }

        text
    }
}
