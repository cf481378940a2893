//! Streaming a child's output through the colorizer.
//!
//! stdout and stderr are read concurrently by two tasks that feed one
//! channel, so lines reach the terminal in the order they were produced
//! rather than one stream after the other.

use std::io::{self, Write};
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use termcolor::{StandardStream, WriteColor};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{ColorWhen, Colorizer, Tone};

/// Which output stream of the child a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// Writes colorized lines to a pair of outputs.
///
/// Lines read from the child's stdout go to `out`, stderr lines go to `err`.
/// Every line is flushed as soon as it is written.
pub struct LineSink<O, E> {
    // ---
    out: O,
    err: E,
    colorizer: Colorizer,
}

impl LineSink<StandardStream, StandardStream> {
    // ---
    /// A sink writing to this process's stdout and stderr.
    ///
    /// Color is decided per stream from `color`.
    pub fn terminal(colorizer: Colorizer, color: ColorWhen) -> Self {
        // ---
        Self::new(
            StandardStream::stdout(color.choice_for(atty::Stream::Stdout)),
            StandardStream::stderr(color.choice_for(atty::Stream::Stderr)),
            colorizer,
        )
    }
}

impl<O: WriteColor, E: WriteColor> LineSink<O, E> {
    // ---
    pub fn new(out: O, err: E, colorizer: Colorizer) -> Self {
        Self {
            out,
            err,
            colorizer,
        }
    }

    /// Colorizes and writes one line (without its terminator).
    ///
    /// # Errors
    ///
    /// Returns error if the underlying writer fails.
    pub fn emit(&mut self, kind: StreamKind, line: &str) -> io::Result<()> {
        // ---
        let (text, tone) = self.colorizer.colorize(kind, line);
        match kind {
            StreamKind::Stdout => write_line(&mut self.out, text, tone),
            StreamKind::Stderr => write_line(&mut self.err, text, tone),
        }
    }

    /// Gives back the writers.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn write_line<W: WriteColor>(w: &mut W, text: &str, tone: Option<Tone>) -> io::Result<()> {
    // ---
    match tone {
        Some(tone) => {
            w.set_color(&tone.spec())?;
            write!(w, "{text}")?;
            w.reset()?;
            writeln!(w)?;
        }
        None => writeln!(w, "{text}")?,
    }
    w.flush()
}

/// Runs `command` with piped output and streams every line into `sink`.
///
/// Returns once the child has exited and both streams are drained.
///
/// # Errors
///
/// Returns error if the child cannot be spawned or waited on, if reading its
/// output fails, or if writing to the sink fails.
pub async fn run_streaming<O, E>(
    mut command: Command,
    sink: &mut LineSink<O, E>,
) -> Result<ExitStatus>
where
    O: WriteColor,
    E: WriteColor,
{
    // ---
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    debug!("Running command: {:?}", command);

    let program = command.as_std().get_program().to_string_lossy().into_owned();
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let stderr = child.stderr.take().context("child stderr was not captured")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stdout_handle = tokio::spawn(forward_lines(stdout, StreamKind::Stdout, tx.clone()));
    let stderr_handle = tokio::spawn(forward_lines(stderr, StreamKind::Stderr, tx));

    // Ends once both readers have hit EOF and dropped their senders
    while let Some((kind, line)) = rx.recv().await {
        sink.emit(kind, &line).context("failed to write child output")?;
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("failed waiting for {program}"))?;

    stdout_handle
        .await
        .context("stdout reader task failed")?
        .context("failed to read child stdout")?;
    stderr_handle
        .await
        .context("stderr reader task failed")?
        .context("failed to read child stderr")?;

    if !status.success() {
        warn!("{} exited with {}", program, status);
    }

    Ok(status)
}

/// Reads `reader` line by line and sends each line tagged with `kind`.
async fn forward_lines<R>(
    reader: R,
    kind: StreamKind,
    tx: mpsc::UnboundedSender<(StreamKind, String)>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    // ---
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        if tx.send((kind, decode_line(&buf))).is_err() {
            // Sink is gone; nothing left to do with the output
            return Ok(());
        }
    }
}

/// Strips the line terminator and decodes lossily.
fn decode_line(raw: &[u8]) -> String {
    // ---
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
