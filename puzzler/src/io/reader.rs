use {
    super::*,
    std::{
        fs::File,
        io::{BufReader, ErrorKind, Read, StdinLock},
        path::Path,
    },
};

/// Read-only [`Stream`] over any [`Read`] source.
///
/// Short reads and [`ErrorKind::Interrupted`] are retried until the request is
/// satisfied. Reaching the end of the source with bytes still outstanding is a
/// [`StreamError::EndOfStream`]. Sending always fails with
/// [`StreamError::Unsupported`].
pub struct ReadStream<R> {
    inner: R,
    received: u64,
    kind: &'static str,
}

/// File-backed read channel.
pub type FileInStream = ReadStream<BufReader<File>>;

/// Standard input read channel.
pub type StdinStream = ReadStream<StdinLock<'static>>;

impl<R: Read> ReadStream<R> {
    pub const fn new(inner: R) -> Self {
        Self::with_kind(inner, "read stream")
    }

    pub const fn with_kind(inner: R, kind: &'static str) -> Self {
        Self {
            inner,
            received: 0,
            kind,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl FileInStream {
    /// Open `path` for reading, failing immediately if it cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> StreamResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_kind(BufReader::new(file), "file input stream"))
    }
}

impl StdinStream {
    pub fn stdin() -> Self {
        Self::with_kind(std::io::stdin().lock(), "stdin")
    }
}

impl<R: Read> Stream for ReadStream<R> {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn recv(&mut self, dst: &mut [u8]) -> StreamResult<()> {
        let mut filled = 0;
        while filled < dst.len() {
            match self.inner.read(&mut dst[filled..]) {
                Ok(0) => return Err(end_of_stream(dst.len(), filled)),
                Ok(got) => {
                    filled += got;
                    self.received += got as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn recv_offset(&self) -> u64 {
        self.received
    }
}
