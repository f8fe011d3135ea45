/*!
 * Output line sinks.
 */

use std::io;

/// Destination for exported lines
pub trait LineSink {
    /// Write one complete line (without terminator)
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// In-memory sink
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    pub lines: Vec<String>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl LineSink for VecSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}
