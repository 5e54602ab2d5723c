use std::borrow::Cow;
use std::fmt::Display;
use std::io::Write;

use crate::core::clock::{Clock, SystemClock, TimestampFormat};
use crate::core::error::Result;
use crate::core::rank::RankProvider;
use crate::core::render::render_block;
use crate::core::sink::Sink;
use crate::core::world::DefaultProvider;

/// Printer-wide settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Strip one space after every newline of the block (default: true)
    pub strip_continuation_space: bool,
    /// How the header renders its timestamp (default: [`TimestampFormat::Local`])
    pub timestamp_format: TimestampFormat,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            strip_continuation_space: true,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

/// Per-call options, mirroring the knobs of a plain print call.
#[derive(Debug)]
pub struct PrintOptions<'a> {
    /// Placed between values (default: `" "`)
    pub sep: Cow<'a, str>,
    /// Appended after the last value (default: `"\n"`)
    pub end: Cow<'a, str>,
    /// Destination of the block (default: standard output)
    pub sink: Sink<'a>,
    /// Flush the sink after writing (default: false)
    pub flush: bool,
}

impl Default for PrintOptions<'_> {
    fn default() -> Self {
        Self {
            sep: Cow::Borrowed(" "),
            end: Cow::Borrowed("\n"),
            sink: Sink::Stdout,
            flush: false,
        }
    }
}

impl<'a> PrintOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sep(mut self, sep: impl Into<Cow<'a, str>>) -> Self {
        self.sep = sep.into();
        self
    }

    pub fn end(mut self, end: impl Into<Cow<'a, str>>) -> Self {
        self.end = end.into();
        self
    }

    /// Sends the block to `writer` instead of standard output.
    pub fn sink(mut self, writer: &'a mut dyn Write) -> Self {
        self.sink = Sink::Writer(writer);
        self
    }

    pub fn stderr(mut self) -> Self {
        self.sink = Sink::Stderr;
        self
    }

    pub fn flush(mut self, flush: bool) -> Self {
        self.flush = flush;
        self
    }
}

/// Options for [`AttributedPrinter::print_async`], where the writer is passed directly.
#[cfg(feature = "tokio")]
#[derive(Clone, Debug)]
pub struct AsyncPrintOptions<'a> {
    pub sep: Cow<'a, str>,
    pub end: Cow<'a, str>,
    pub flush: bool,
}

#[cfg(feature = "tokio")]
impl Default for AsyncPrintOptions<'_> {
    fn default() -> Self {
        Self {
            sep: Cow::Borrowed(" "),
            end: Cow::Borrowed("\n"),
            flush: false,
        }
    }
}

#[cfg(feature = "tokio")]
impl<'a> AsyncPrintOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sep(mut self, sep: impl Into<Cow<'a, str>>) -> Self {
        self.sep = sep.into();
        self
    }

    pub fn end(mut self, end: impl Into<Cow<'a, str>>) -> Self {
        self.end = end.into();
        self
    }

    pub fn flush(mut self, flush: bool) -> Self {
        self.flush = flush;
        self
    }
}

/// Prints values preceded by a header naming the rank of this process and the time.
///
/// Each call assembles the whole block in memory and hands it to the sink in a
/// single write, so the header and body of one call stay together.
pub struct AttributedPrinter<R = DefaultProvider, C = SystemClock> {
    ranks: R,
    clock: C,
    config: PrinterConfig,
}

impl AttributedPrinter {
    /// A printer using [`DefaultProvider`] for the rank.
    pub fn new() -> Self {
        Self::with_provider(DefaultProvider::new())
    }
}

impl Default for AttributedPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RankProvider> AttributedPrinter<R, SystemClock> {
    pub fn with_provider(ranks: R) -> Self {
        Self {
            ranks,
            clock: SystemClock,
            config: PrinterConfig::default(),
        }
    }
}

impl<R: RankProvider, C: Clock> AttributedPrinter<R, C> {
    /// Swaps the clock, keeping the provider and config.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> AttributedPrinter<R, C2> {
        AttributedPrinter {
            ranks: self.ranks,
            clock,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: PrinterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    pub fn provider(&self) -> &R {
        &self.ranks
    }

    /// Builds the block for `values` without writing it anywhere.
    pub fn render(&self, values: &[&dyn Display], sep: &str, end: &str) -> Result<String> {
        let rank = self.ranks.rank()?;
        let timestamp = self.config.timestamp_format.render(&self.clock.now());
        Ok(render_block(
            rank,
            &timestamp,
            values,
            sep,
            end,
            self.config.strip_continuation_space,
        ))
    }

    /// Renders `values` and writes the block to the sink chosen in `opts`.
    ///
    /// Nothing is written when the rank cannot be resolved.
    pub fn print(&self, values: &[&dyn Display], opts: PrintOptions<'_>) -> Result<()> {
        let PrintOptions {
            sep,
            end,
            mut sink,
            flush,
        } = opts;
        let block = self.render(values, &sep, &end)?;
        log::trace!("writing {} bytes to {:?}", block.len(), sink);
        sink.emit(block.as_bytes(), flush)?;
        Ok(())
    }

    /// Async counterpart of [`print`](Self::print), writing to a tokio writer.
    #[cfg(feature = "tokio")]
    pub async fn print_async<W>(
        &self,
        values: &[&dyn Display],
        opts: AsyncPrintOptions<'_>,
        writer: &mut W,
    ) -> Result<()>
    where
        W: tokio::io::AsyncWrite + Unpin + ?Sized,
    {
        use tokio::io::AsyncWriteExt;

        let block = self.render(values, &opts.sep, &opts.end)?;
        log::trace!("writing {} bytes to async sink", block.len());
        writer.write_all(block.as_bytes()).await?;
        if opts.flush {
            writer.flush().await?;
        }
        Ok(())
    }
}

/// Prints through a default [`AttributedPrinter`].
pub fn attributed_print(values: &[&dyn Display], opts: PrintOptions<'_>) -> Result<()> {
    AttributedPrinter::new().print(values, opts)
}

/// Prints its arguments through [`attributed_print`], like `println!` takes values.
///
/// ```rust,no_run
/// use mpi_print::{attributed_print, PrintOptions};
///
/// attributed_print!("hello", 42)?;
/// attributed_print!(PrintOptions::new().sep("-"); "a", "b")?;
/// # Ok::<(), mpi_print::PrintError>(())
/// ```
#[macro_export]
macro_rules! attributed_print {
    ($opts:expr; $($value:expr),* $(,)?) => {
        $crate::attributed_print(&[$(&$value as &dyn ::std::fmt::Display),*], $opts)
    };
    ($($value:expr),* $(,)?) => {
        $crate::attributed_print(
            &[$(&$value as &dyn ::std::fmt::Display),*],
            $crate::PrintOptions::default(),
        )
    };
}
