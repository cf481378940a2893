//! Color policy for wrapper output.
//!
//! - Command-line choice wins.
//! - `NO_COLOR` disables colors.
//! - `EMACS` implies non-interactive output.
//! - In `Auto`, only enable colors when the target stream is a TTY.
//!
//! The same policy drives both the tracing subscriber and the line colorizer,
//! so a single `--color` flag controls everything the wrapper prints.

use std::env;

use termcolor::ColorChoice;

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorWhen {
    /// Enable colors only when output is a TTY.
    #[default]
    Auto,

    /// Always enable colors.
    Always,

    /// Never enable colors.
    Never,
}

impl ColorWhen {
    // ---
    /// Returns whether ANSI color should be used for the given stream.
    pub fn should_color(self, stream: atty::Stream) -> bool {
        match self {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => {
                if env::var_os("NO_COLOR").is_some() {
                    return false;
                }

                if env::var_os("EMACS").is_some() {
                    return false;
                }

                atty::is(stream)
            }
        }
    }

    /// Convenience helper for stdout.
    pub fn should_color_stdout(self) -> bool {
        self.should_color(atty::Stream::Stdout)
    }

    /// Convenience helper for stderr.
    pub fn should_color_stderr(self) -> bool {
        self.should_color(atty::Stream::Stderr)
    }

    /// Resolves the policy into a `termcolor` choice for one stream.
    ///
    /// `Auto` is decided here, once, so the writer never second-guesses it.
    pub fn choice_for(self, stream: atty::Stream) -> ColorChoice {
        // ---
        if self.should_color(stream) {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        }
    }
}
