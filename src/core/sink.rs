use std::io::{self, Write};

/// Where a rendered block goes.
#[derive(Default)]
pub enum Sink<'a> {
    #[default]
    Stdout,
    Stderr,
    Writer(&'a mut dyn Write),
}

impl Sink<'_> {
    /// Writes `block` in one call and optionally flushes.
    ///
    /// The standard streams are locked for the duration, so another thread of
    /// this process cannot slip output in between.
    pub(crate) fn emit(&mut self, block: &[u8], flush: bool) -> io::Result<()> {
        match self {
            Sink::Stdout => write_block(&mut io::stdout().lock(), block, flush),
            Sink::Stderr => write_block(&mut io::stderr().lock(), block, flush),
            Sink::Writer(w) => write_block(&mut **w, block, flush),
        }
    }
}

impl std::fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

fn write_block<W: Write + ?Sized>(w: &mut W, block: &[u8], flush: bool) -> io::Result<()> {
    w.write_all(block)?;
    if flush {
        w.flush()?;
    }
    Ok(())
}

/// In-memory sink that keeps every write call separate.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    writes: Vec<Vec<u8>>,
    flushes: usize,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls received.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Each write call, decoded lossily.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    /// Everything written so far, concatenated.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.writes.concat()).into_owned()
    }
}

impl Write for CaptureSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
