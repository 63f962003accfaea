//! [`Transcode`] implementations for primitives and std containers.
use {
    super::{PersistContext, Transcode},
    crate::error::{PersistResult, invalid_bool},
};

impl Transcode for u32 {
    #[inline]
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        let mut buf = self.to_be_bytes();
        ctx.bytes(&mut buf)?;
        *self = u32::from_be_bytes(buf);
        Ok(())
    }
}

/// High word, then low word.
impl Transcode for u64 {
    #[inline]
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        let mut hi = (*self >> 32) as u32;
        let mut lo = *self as u32;
        ctx.transcode(&mut hi)?.transcode(&mut lo)?;
        *self = (u64::from(hi) << 32) | u64::from(lo);
        Ok(())
    }
}

impl Transcode for i32 {
    #[inline]
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        let mut bits = *self as u32;
        bits.transcode(ctx)?;
        *self = bits as i32;
        Ok(())
    }
}

/// IEEE-754 bit pattern through the `u64` path.
impl Transcode for f64 {
    #[inline]
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        let mut bits = self.to_bits();
        bits.transcode(ctx)?;
        *self = f64::from_bits(bits);
        Ok(())
    }
}

impl Transcode for bool {
    #[inline]
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        let mut byte = [u8::from(*self)];
        ctx.bytes(&mut byte)?;
        *self = match byte[0] {
            0 => false,
            1 => true,
            other => return Err(invalid_bool(other)),
        };
        Ok(())
    }

    /// Count prefix, then `ceil(count / 8)` bytes with element `i` at bit `i % 8` (LSB first)
    /// of byte `i / 8`.
    fn transcode_vec(vec: &mut Vec<Self>, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        let len = ctx.transcode_len(vec.len())?;
        let packed_len = len.div_ceil(8);
        if ctx.is_sending() {
            let mut packed = vec![0u8; packed_len];
            for (i, _) in vec.iter().enumerate().filter(|(_, bit)| **bit) {
                packed[i / 8] |= 1 << (i % 8);
            }
            return ctx.send_bytes(&packed);
        }

        ctx.check_preallocation(packed_len, 1)?;
        let mut packed = vec![0u8; packed_len];
        ctx.bytes(&mut packed)?;
        vec.clear();
        vec.extend((0..len).map(|i| (packed[i / 8] >> (i % 8)) & 1 == 1));
        Ok(())
    }
}

/// Byte count prefix, then the raw UTF-8 bytes without a terminator.
impl Transcode for String {
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        if ctx.is_sending() {
            ctx.transcode_len(self.len())?;
            return ctx.send_bytes(self.as_bytes());
        }

        *self = String::from_utf8(ctx.recv_byte_string()?).map_err(|e| e.utf8_error())?;
        Ok(())
    }
}

impl<T: Transcode + Default> Transcode for Vec<T> {
    #[inline]
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        T::transcode_vec(self, ctx)
    }
}
