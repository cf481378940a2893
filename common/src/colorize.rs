//! Prefix-based line colorization.
//!
//! colcon marks interesting lines with fixed prefixes (`Starting >>>`,
//! `--- stderr:`, gtest's `[  FAILED  ]`, ...). A [`Colorizer`] holds one
//! ordered rule table per stream and tags each line with the [`Tone`] of the
//! first matching prefix. Nothing carries over from one line to the next.

use termcolor::{Color, ColorSpec};

use crate::stream::StreamKind;

/// Semantic color class of a matched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Progress markers.
    Highlight,

    /// Failures and captured stderr sections.
    Alert,
}

impl Tone {
    // ---
    /// Terminal color used for this tone.
    pub fn color(self) -> Color {
        match self {
            Tone::Highlight => Color::Green,
            Tone::Alert => Color::Red,
        }
    }

    /// Foreground-only spec for `termcolor` writers.
    pub fn spec(self) -> ColorSpec {
        // ---
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(self.color()));
        spec
    }
}

/// A line prefix and the tone it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub prefix: &'static str,
    pub tone: Tone,
}

impl Rule {
    const fn new(prefix: &'static str, tone: Tone) -> Self {
        Self { prefix, tone }
    }
}

const FAILURE_MESSAGE: &str = "  <<< failure message";
const STYLE_DIVERGENCE: &str = "    Code style divergence in file";
const TEST_FAILED: &str = "    [  FAILED  ]";

/// `colcon test` stdout: package start/finish markers.
pub const TEST_STDOUT_RULES: &[Rule] = &[
    Rule::new("Starting >>>", Tone::Highlight),
    Rule::new("Finished <<<", Tone::Highlight),
];

/// `colcon test` stderr: captured stderr sections and failure details.
pub const TEST_STDERR_RULES: &[Rule] = &[
    Rule::new("--- stderr:", Tone::Alert),
    Rule::new(FAILURE_MESSAGE, Tone::Alert),
    Rule::new(STYLE_DIVERGENCE, Tone::Alert),
    Rule::new(TEST_FAILED, Tone::Alert),
];

/// `colcon test-result --verbose` stdout: failure details.
pub const RESULT_STDOUT_RULES: &[Rule] = &[
    Rule::new(FAILURE_MESSAGE, Tone::Alert),
    Rule::new(STYLE_DIVERGENCE, Tone::Alert),
    Rule::new(TEST_FAILED, Tone::Alert),
];

/// Tags `line` with the tone of the first rule whose prefix it starts with.
///
/// The text is returned unchanged; only the tone differs.
pub fn colorize<'a>(line: &'a str, rules: &[Rule]) -> (&'a str, Option<Tone>) {
    // ---
    let tone = rules
        .iter()
        .find(|rule| line.starts_with(rule.prefix))
        .map(|rule| rule.tone);

    (line, tone)
}

/// Rule tables for both streams of one colcon invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colorizer {
    // ---
    stdout: &'static [Rule],
    stderr: &'static [Rule],
}

impl Colorizer {
    // ---
    pub const fn new(stdout: &'static [Rule], stderr: &'static [Rule]) -> Self {
        Self { stdout, stderr }
    }

    /// Tables for `colcon test`.
    pub const fn test_run() -> Self {
        Self::new(TEST_STDOUT_RULES, TEST_STDERR_RULES)
    }

    /// Tables for `colcon test-result --verbose`; stderr passes through.
    pub const fn test_result() -> Self {
        Self::new(RESULT_STDOUT_RULES, &[])
    }

    /// Rules applied to lines from `kind`.
    pub fn rules(&self, kind: StreamKind) -> &'static [Rule] {
        match kind {
            StreamKind::Stdout => self.stdout,
            StreamKind::Stderr => self.stderr,
        }
    }

    /// Tags one line read from `kind`.
    pub fn colorize<'a>(&self, kind: StreamKind, line: &'a str) -> (&'a str, Option<Tone>) {
        colorize(line, self.rules(kind))
    }
}
