use {
    super::*,
    std::io::{ErrorKind, StdoutLock, Write},
};

/// Write-only [`Stream`] over any [`Write`] sink.
///
/// Short writes and [`ErrorKind::Interrupted`] are retried until every byte is
/// accepted. A sink that accepts zero bytes is a [`StreamError::WriteZero`].
/// Receiving always fails with [`StreamError::Unsupported`].
pub struct WriteStream<W> {
    inner: W,
    sent: u64,
    kind: &'static str,
}

/// Standard output write channel.
pub type StdoutStream = WriteStream<StdoutLock<'static>>;

impl<W: Write> WriteStream<W> {
    pub const fn new(inner: W) -> Self {
        Self::with_kind(inner, "write stream")
    }

    pub const fn with_kind(inner: W, kind: &'static str) -> Self {
        Self {
            inner,
            sent: 0,
            kind,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl StdoutStream {
    pub fn stdout() -> Self {
        Self::with_kind(std::io::stdout().lock(), "stdout")
    }
}

impl<W: Write> Stream for WriteStream<W> {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn send(&mut self, src: &[u8]) -> StreamResult<()> {
        let mut written = 0;
        while written < src.len() {
            match self.inner.write(&src[written..]) {
                Ok(0) => return Err(write_zero(src.len(), written)),
                Ok(sent) => {
                    written += sent;
                    self.sent += sent as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn send_offset(&self) -> u64 {
        self.sent
    }

    fn finish(&mut self) -> StreamResult<()> {
        Ok(self.inner.flush()?)
    }
}
