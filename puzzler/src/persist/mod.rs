//! Codec context and the [`Transcode`] trait.
//!
//! A [`PersistContext`] binds one [`Stream`] to one [`Direction`] for its whole lifetime. Every
//! transcodable type exposes a single [`Transcode::transcode`] routine that writes the value when
//! the context is sending and overwrites it when the context is receiving, so encode and decode
//! share one field walk.
//!
//! # Example
//!
//! ```
//! use puzzler::{io::MemoryStream, persist::PersistContext};
//!
//! let mut stream = MemoryStream::new();
//! let (mut n, mut name) = (0x01020304u32, String::from("life"));
//! PersistContext::sending(&mut stream)
//!     .transcode(&mut n)?
//!     .transcode(&mut name)?;
//! assert_eq!(&stream.as_slice()[..4], &[1, 2, 3, 4]);
//!
//! let (mut n2, mut name2) = (0u32, String::new());
//! PersistContext::receiving(&mut stream)
//!     .transcode(&mut n2)?
//!     .transcode(&mut name2)?;
//! assert_eq!((n2, name2.as_str()), (n, "life"));
//! # Ok::<(), puzzler::PersistError>(())
//! ```
use crate::{
    config::ContextConfig,
    error::{
        PersistResult, length_overflow, preallocation_size_limit, protocol_mismatch,
        wrong_direction,
    },
    io::{MemoryStream, Stream},
};

mod impls;

/// Which way a [`PersistContext`] moves bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Encode in-memory values onto the stream.
    Send,
    /// Decode values from the stream into memory.
    Recv,
}

/// Session binding one direction to one [`Stream`].
pub struct PersistContext<'a> {
    stream: &'a mut dyn Stream,
    direction: Direction,
    config: ContextConfig,
}

impl std::fmt::Debug for PersistContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistContext")
            .field("direction", &self.direction)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> PersistContext<'a> {
    pub fn new(stream: &'a mut dyn Stream, direction: Direction) -> Self {
        Self {
            stream,
            direction,
            config: ContextConfig::new(),
        }
    }

    pub fn sending(stream: &'a mut dyn Stream) -> Self {
        Self::new(stream, Direction::Send)
    }

    pub fn receiving(stream: &'a mut dyn Stream) -> Self {
        Self::new(stream, Direction::Recv)
    }

    pub fn with_config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn is_sending(&self) -> bool {
        self.direction == Direction::Send
    }

    #[inline]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn send_offset(&self) -> u64 {
        self.stream.send_offset()
    }

    pub fn recv_offset(&self) -> u64 {
        self.stream.recv_offset()
    }

    /// Flush the underlying stream.
    pub fn finish(&mut self) -> PersistResult<()> {
        Ok(self.stream.finish()?)
    }

    /// Fail unless the context moves bytes in `expected` direction.
    pub fn require_direction(&self, expected: Direction) -> PersistResult<()> {
        if self.direction != expected {
            return Err(wrong_direction(expected));
        }
        Ok(())
    }

    /// Transcode `value` in the context's direction.
    ///
    /// Returns the context so calls can be chained field by field.
    #[inline]
    pub fn transcode<T: Transcode>(&mut self, value: &mut T) -> PersistResult<&mut Self> {
        value.transcode(self)?;
        Ok(self)
    }

    /// Transcode a string that must equal `expected`.
    ///
    /// When sending, a mismatching `value` fails before anything is written. When receiving,
    /// exactly one string is consumed and then compared byte for byte, so a tag that is not
    /// valid UTF-8 is a mismatch too.
    pub fn transcode_required(
        &mut self,
        value: &mut String,
        expected: &str,
    ) -> PersistResult<&mut Self> {
        if self.is_sending() {
            if value.as_str() != expected {
                return Err(protocol_mismatch(expected, value));
            }
            value.transcode(self)?;
            return Ok(self);
        }

        let raw = self.recv_byte_string()?;
        if raw != expected.as_bytes() {
            return Err(protocol_mismatch(expected, &String::from_utf8_lossy(&raw)));
        }
        expected.clone_into(value);
        Ok(self)
    }

    /// Receive a length-prefixed byte string without interpreting it.
    pub(crate) fn recv_byte_string(&mut self) -> PersistResult<Vec<u8>> {
        let len = self.transcode_len(0)?;
        self.check_preallocation(len, 1)?;
        let mut buf = vec![0u8; len];
        self.bytes(&mut buf)?;
        Ok(buf)
    }

    /// Transcode a 32-bit element count.
    ///
    /// When sending, `len` is written and returned. When receiving, `len` is ignored and the
    /// decoded count is returned.
    pub fn transcode_len(&mut self, len: usize) -> PersistResult<usize> {
        let mut count = match self.direction {
            Direction::Send => u32::try_from(len).map_err(|_| length_overflow(len))?,
            Direction::Recv => 0,
        };
        count.transcode(self)?;
        Ok(count as usize)
    }

    /// Fail if holding `count` items of `item_size` bytes would exceed the preallocation limit.
    pub fn check_preallocation(&self, count: usize, item_size: usize) -> PersistResult<()> {
        let limit = self.config.preallocation_size_limit();
        let needed = count.saturating_mul(item_size);
        if needed > limit {
            return Err(preallocation_size_limit(needed, limit));
        }
        Ok(())
    }

    /// Check the preallocation limit for a decoded sequence of `T`.
    #[inline]
    pub fn check_preallocation_for<T>(&self, count: usize) -> PersistResult<()> {
        self.check_preallocation(count, size_of::<T>().max(1))
    }

    /// Send `buf`, or fill it from the stream, depending on direction.
    #[inline]
    pub fn bytes(&mut self, buf: &mut [u8]) -> PersistResult<()> {
        match self.direction {
            Direction::Send => self.stream.send(buf)?,
            Direction::Recv => self.stream.recv(buf)?,
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn send_bytes(&mut self, buf: &[u8]) -> PersistResult<()> {
        Ok(self.stream.send(buf)?)
    }
}

/// Types with a symmetric wire encoding.
///
/// Implementations must consume on receive exactly the fields, in exactly the order, that
/// they produce on send.
pub trait Transcode {
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()>;

    /// Transcode a `Vec<Self>`: a 32-bit count followed by the elements.
    ///
    /// On receive the vector is resized to the decoded count before it is filled. The default
    /// transcodes element by element; `bool` overrides it with a bit-packed layout.
    fn transcode_vec(vec: &mut Vec<Self>, ctx: &mut PersistContext<'_>) -> PersistResult<()>
    where
        Self: Sized + Default,
    {
        let len = ctx.transcode_len(vec.len())?;
        if !ctx.is_sending() {
            ctx.check_preallocation_for::<Self>(len)?;
            vec.clear();
            vec.resize_with(len, Self::default);
        }
        for item in vec.iter_mut() {
            item.transcode(ctx)?;
        }
        Ok(())
    }
}

/// Encode `value` into a fresh byte buffer.
pub fn to_bytes<T: Transcode>(value: &mut T) -> PersistResult<Vec<u8>> {
    let mut stream = MemoryStream::new();
    PersistContext::sending(&mut stream).transcode(value)?;
    Ok(stream.into_inner())
}

/// Decode a `T` from the front of `bytes`.
pub fn from_bytes<T: Transcode + Default>(bytes: &[u8]) -> PersistResult<T> {
    let mut stream = MemoryStream::from_bytes(bytes.to_vec());
    let mut value = T::default();
    PersistContext::receiving(&mut stream).transcode(&mut value)?;
    Ok(value)
}
