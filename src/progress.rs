//! Shared progress and console helpers to keep the progress bar pinned.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(|| {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        mp
    })
}

/// Progress bar over the sections that will be stored
pub fn add_progress_bar(len: u64) -> ProgressBar {
    let pb = multi_progress().add(ProgressBar::new(len));
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} sections {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Writes report lines to stdout with the progress bar suspended
#[derive(Default)]
pub struct ReportWriter;

impl Write for ReportWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        multi_progress().suspend(|| io::stdout().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

#[derive(Default, Clone)]
pub struct LogWriterFactory;

/// Buffers tracing output and prints whole lines above the progress bar
pub struct LogWriter {
    buffer: String,
}

impl LogWriter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn print_line(line: &str) {
        let line = line.trim_end_matches('\r').to_string();
        let _ = multi_progress().suspend(|| writeln!(io::stderr(), "{}", line));
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        Self::print_line(self.buffer.trim_end_matches('\n'));
        self.buffer.clear();
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = String::from_utf8_lossy(buf);
        self.buffer.push_str(&chunk);

        while let Some(idx) = self.buffer.find('\n') {
            Self::print_line(&self.buffer[..idx]);
            self.buffer.drain(..idx + 1);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer();
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter::new()
    }
}
