//! [`Stream`] trait and its implementations.
//!
//! A [`Stream`] is a blocking byte channel. Transfers are all-or-nothing from
//! the caller's point of view: implementations retry partial transfers
//! internally and only fail when the transport ends or errors while bytes are
//! still outstanding.
use {std::path::PathBuf, thiserror::Error};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("{stream} does not support {op}")]
    Unsupported {
        op: &'static str,
        stream: &'static str,
    },
    #[error("End of stream after {received} of {needed} bytes")]
    EndOfStream { needed: usize, received: usize },
    #[error("Transport accepted no data after {sent} of {needed} bytes")]
    WriteZero { needed: usize, sent: usize },
    #[error("Couldn't open '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StreamResult<T> = core::result::Result<T, StreamError>;

#[cold]
pub const fn unsupported(op: &'static str, stream: &'static str) -> StreamError {
    StreamError::Unsupported { op, stream }
}

#[cold]
pub const fn end_of_stream(needed: usize, received: usize) -> StreamError {
    StreamError::EndOfStream { needed, received }
}

#[cold]
pub const fn write_zero(needed: usize, sent: usize) -> StreamError {
    StreamError::WriteZero { needed, sent }
}

/// Blocking, exact-count byte channel.
///
/// # Offset semantics
/// - [`Stream::send_offset`] and [`Stream::recv_offset`] count bytes actually moved in each
///   direction since the stream was opened. They only ever grow.
/// - A direction the stream does not support always reports `0`.
///
/// # Direction
/// Both transfer methods default to [`StreamError::Unsupported`], so a read-only stream only
/// implements [`Stream::recv`] and a write-only stream only implements [`Stream::send`].
pub trait Stream {
    /// Short human-readable name used in diagnostics (e.g. `"stdin"`).
    fn kind(&self) -> &'static str;

    /// Write exactly `src.len()` bytes.
    #[expect(unused_variables)]
    fn send(&mut self, src: &[u8]) -> StreamResult<()> {
        Err(unsupported("send", self.kind()))
    }

    /// Fill exactly `dst.len()` bytes.
    #[expect(unused_variables)]
    fn recv(&mut self, dst: &mut [u8]) -> StreamResult<()> {
        Err(unsupported("recv", self.kind()))
    }

    fn send_offset(&self) -> u64 {
        0
    }

    fn recv_offset(&self) -> u64 {
        0
    }

    /// Flush anything the stream buffers internally.
    fn finish(&mut self) -> StreamResult<()> {
        Ok(())
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    #[inline]
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    #[inline]
    fn send(&mut self, src: &[u8]) -> StreamResult<()> {
        (**self).send(src)
    }

    #[inline]
    fn recv(&mut self, dst: &mut [u8]) -> StreamResult<()> {
        (**self).recv(dst)
    }

    #[inline]
    fn send_offset(&self) -> u64 {
        (**self).send_offset()
    }

    #[inline]
    fn recv_offset(&self) -> u64 {
        (**self).recv_offset()
    }

    #[inline]
    fn finish(&mut self) -> StreamResult<()> {
        (**self).finish()
    }
}

mod memory;
mod reader;
mod writer;
pub use {
    memory::MemoryStream,
    reader::{FileInStream, ReadStream, StdinStream},
    writer::{StdoutStream, WriteStream},
};
