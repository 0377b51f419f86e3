//! Console writer for engine announcements.
//!
//! The progress observer redraws its line in place on stdout from another thread.
//! Announcements are held until a line is complete and then written with a single
//! `write_all`, which holds the stdout lock for the whole line, so a render can only
//! land between lines. On a terminal each line first erases the partial progress line.

use std::io::{self, IsTerminal, Write};

const CLEAR_LINE: &[u8] = b"\r\x1b[2K";

pub struct LineConsole<W: Write> {
    inner: W,
    clear_line: bool,
    pending: Vec<u8>,
}

impl LineConsole<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let clear_line = out.is_terminal();
        Self::new(out, clear_line)
    }
}

impl<W: Write> LineConsole<W> {
    pub fn new(inner: W, clear_line: bool) -> Self {
        Self {
            inner,
            clear_line,
            pending: Vec::new(),
        }
    }

    /// Writes `lines` (the last one possibly unterminated) in one call.
    fn emit(&mut self, lines: &[u8]) -> io::Result<()> {
        if !self.clear_line {
            return self.inner.write_all(lines);
        }
        let mut out = Vec::with_capacity(lines.len() + 2 * CLEAR_LINE.len());
        for line in lines.split_inclusive(|&b| b == b'\n') {
            out.extend_from_slice(CLEAR_LINE);
            out.extend_from_slice(line);
        }
        self.inner.write_all(&out)
    }
}

impl<W: Write> Write for LineConsole<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(last_nl) = self.pending.iter().rposition(|&b| b == b'\n') {
            let rest = self.pending.split_off(last_nl + 1);
            let complete = std::mem::replace(&mut self.pending, rest);
            self.emit(&complete)?;
        }
        Ok(buf.len())
    }

    /// Writes out a partial line, if any.
    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let partial = std::mem::take(&mut self.pending);
            self.emit(&partial)?;
        }
        self.inner.flush()
    }
}

impl<W: Write> Drop for LineConsole<W> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::debug!("console flush failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every `write` call separately.
    #[derive(Clone, Default)]
    struct Calls(Arc<Mutex<Vec<Vec<u8>>>>);

    impl Write for Calls {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Calls {
        fn strings(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .map(|c| String::from_utf8(c.clone()).unwrap())
                .collect()
        }
    }

    #[test]
    fn pieces_of_a_line_reach_the_sink_in_one_write() {
        let calls = Calls::default();
        let mut c = LineConsole::new(calls.clone(), true);
        write!(c, "Saving to: {}", "a.bin").unwrap();
        assert!(calls.strings().is_empty(), "partial line held back");
        writeln!(c).unwrap();
        writeln!(c, "next {}", 2).unwrap();
        assert_eq!(
            calls.strings(),
            vec!["\r\x1b[2KSaving to: a.bin\n", "\r\x1b[2Knext 2\n"]
        );
    }

    #[test]
    fn plain_output_gets_no_escape_codes() {
        let calls = Calls::default();
        let mut c = LineConsole::new(calls.clone(), false);
        write!(c, "Saving to: ").unwrap();
        write!(c, "a.bin\nSaving").unwrap();
        assert_eq!(calls.strings(), vec!["Saving to: a.bin\n"]);
        drop(c);
        assert_eq!(calls.strings(), vec!["Saving to: a.bin\n", "Saving"]);
    }

    #[test]
    fn flush_writes_partial_line_once() {
        let calls = Calls::default();
        let mut c = LineConsole::new(calls.clone(), true);
        write!(c, "tail").unwrap();
        c.flush().unwrap();
        c.flush().unwrap();
        drop(c);
        assert_eq!(calls.strings(), vec!["\r\x1b[2Ktail"]);
    }
}
