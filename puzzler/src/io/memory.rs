use super::*;

/// In-memory bidirectional [`Stream`] over a `Vec<u8>`.
///
/// Sends append to the end of the buffer and receives consume from an internal
/// read position, so bytes written by one context can be read back by another.
///
/// # Examples
///
/// ```
/// use puzzler::io::{MemoryStream, Stream};
///
/// let mut stream = MemoryStream::new();
/// stream.send(&[1, 2, 3]).unwrap();
///
/// let mut dst = [0; 2];
/// stream.recv(&mut dst).unwrap();
/// assert_eq!(dst, [1, 2]);
/// assert_eq!(stream.remaining(), &[3]);
/// assert_eq!((stream.send_offset(), stream.recv_offset()), (3, 2));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStream {
    buf: Vec<u8>,
    pos: usize,
    sent: u64,
}

impl MemoryStream {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            pos: 0,
            sent: 0,
        }
    }

    /// Creates a stream whose receive side yields `bytes`.
    ///
    /// The pre-loaded bytes do not count towards [`Stream::send_offset`].
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buf: bytes,
            pos: 0,
            sent: 0,
        }
    }

    /// Bytes not yet received.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    /// Every byte held by the stream, including ones already received.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the stream and returns the whole buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Stream for MemoryStream {
    fn kind(&self) -> &'static str {
        "memory stream"
    }

    #[inline]
    fn send(&mut self, src: &[u8]) -> StreamResult<()> {
        self.buf.extend_from_slice(src);
        self.sent += src.len() as u64;
        Ok(())
    }

    #[inline]
    fn recv(&mut self, dst: &mut [u8]) -> StreamResult<()> {
        let src = self.remaining();
        let Some(src) = src.get(..dst.len()) else {
            return Err(end_of_stream(dst.len(), src.len()));
        };
        dst.copy_from_slice(src);
        self.pos += dst.len();
        Ok(())
    }

    fn send_offset(&self) -> u64 {
        self.sent
    }

    fn recv_offset(&self) -> u64 {
        self.pos as u64
    }
}
