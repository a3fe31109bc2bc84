use std::fmt;

use serde::Serialize;

const TITLE: &str = "mrdset Validation Report";
const RULE: &str = "========================";

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed, with a note worth reading
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    /// Whether the check passed without warnings
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    /// Whether the check passed with a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    /// Whether the check failed
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    fn tone(&self) -> Tone {
        match self {
            CheckStatus::Ok => Tone::Pass,
            CheckStatus::Warning(_) => Tone::Warn,
            CheckStatus::Failed(_) => Tone::Fail,
        }
    }

    /// Label and message shown after the check name
    fn detail(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }
}

/// One named check and its outcome
#[derive(Debug, Clone, Serialize)]
pub struct ValidationCheck {
    /// Name of the check
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Tally of check outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CheckCounts {
    /// Checks that passed cleanly
    pub passed: usize,
    /// Checks that passed with a warning
    pub warnings: usize,
    /// Checks that failed
    pub failed: usize,
}

impl fmt::Display for CheckCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} warnings, {} failed",
            self.passed, self.warnings, self.failed
        )
    }
}

/// Every check run against one container, in the order they ran
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Path of the validated file
    pub file_path: String,
    /// Individual results
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    /// Start an empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            checks: Vec::new(),
        }
    }

    /// Record a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Tally of outcomes
    pub fn counts(&self) -> CheckCounts {
        self.checks
            .iter()
            .fold(CheckCounts::default(), |mut counts, check| {
                match check.status {
                    CheckStatus::Ok => counts.passed += 1,
                    CheckStatus::Warning(_) => counts.warnings += 1,
                    CheckStatus::Failed(_) => counts.failed += 1,
                }
                counts
            })
    }

    /// Look up a check by exact name
    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    fn verdict(&self) -> (Tone, &'static str) {
        if self.has_failures() {
            (Tone::Fail, "Validation FAILED")
        } else if self.has_warnings() {
            (Tone::Warn, "Validation PASSED with warnings")
        } else {
            (Tone::Pass, "Validation PASSED")
        }
    }

    /// Render the report with terminal colors.
    ///
    /// Without the `colorized_output` feature this is the plain rendering.
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            self.render(paint)
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }

    /// Shared layout of the plain and colored renderings
    fn render(&self, paint: fn(Tone, &str) -> String) -> String {
        let mut out = String::new();
        out.push_str(&paint(Tone::Heading, TITLE));
        out.push('\n');
        out.push_str(&paint(Tone::Heading, RULE));
        out.push('\n');
        out.push_str(&format!("{}: {}\n\n", paint(Tone::Strong, "File"), self.file_path));

        for check in &self.checks {
            let tone = check.status.tone();
            out.push_str(&format!(
                "[{}] {}",
                paint(tone, tone.symbol()),
                paint(tone, &check.name)
            ));
            if let Some((label, msg)) = check.status.detail() {
                out.push_str(&format!(" - {}: {}", paint(tone, label), msg));
            }
            out.push('\n');
        }

        let (tone, verdict) = self.verdict();
        out.push_str(&format!(
            "\n{}: {}\n\n{}\n",
            paint(Tone::Strong, "Summary"),
            self.counts(),
            paint(tone, verdict)
        ));
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_, text| text.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Heading,
    Strong,
    Pass,
    Warn,
    Fail,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Tone::Pass => "✓",
            Tone::Warn => "⚠",
            Tone::Fail => "✗",
            Tone::Heading | Tone::Strong => "",
        }
    }
}

#[cfg(feature = "colorized_output")]
fn paint(tone: Tone, text: &str) -> String {
    use console::style;

    let styled = style(text);
    match tone {
        Tone::Heading => styled.bold().cyan(),
        Tone::Strong => styled.bold(),
        Tone::Pass => styled.green(),
        Tone::Warn => styled.yellow(),
        Tone::Fail => styled.red().bold(),
    }
    .to_string()
}
