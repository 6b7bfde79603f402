//! Byte-oriented range coding.
//!
//! The entropy-coder primitive consumed by [`crate::dist`]. The encoder
//! narrows a 32-bit range register by `[cum, cum + freq) / total` slices
//! and emits bytes as the top of the range settles; a 33-bit low
//! register buffers pending `0xff` bytes until a carry resolves them.
//! The decoder mirrors the arithmetic with a code register fed from the
//! compressed bytes.
//!
//! Both sides must see the same sequence of `(cum, freq, total)` triples;
//! the adaptive distributions guarantee that by updating identically
//! during encode and decode.

/// Renormalisation threshold: one byte of headroom in the range register.
const TOP: u32 = 1 << 24;

/// Range encoder writing to an internal byte buffer.
#[derive(Debug)]
pub struct RangeEncoder {
    low: u64,
    range: u32,
    cache: u8,
    cache_size: u64,
    out: Vec<u8>,
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            low: 0,
            range: u32::MAX,
            cache: 0,
            cache_size: 1,
            out: Vec::new(),
        }
    }

    /// Narrows the range to the slice `[cum, cum + freq)` out of `total`.
    ///
    /// `freq` must be nonzero and `cum + freq` must not exceed `total`.
    pub fn encode(&mut self, cum: u32, freq: u32, total: u32) {
        debug_assert!(freq > 0);
        debug_assert!(cum + freq <= total);
        let r = self.range / total;
        self.low += u64::from(r) * u64::from(cum);
        self.range = r * freq;
        while self.range < TOP {
            self.range <<= 8;
            self.shift_low();
        }
    }

    /// Flushes the pending low register and returns the compressed bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        for _ in 0..5 {
            self.shift_low();
        }
        self.out
    }

    fn shift_low(&mut self) {
        // Emit once the top byte can no longer be changed by a carry.
        if self.low < 0xff00_0000 || self.low > 0xffff_ffff {
            let carry = (self.low >> 32) as u8;
            let mut byte = self.cache;
            loop {
                self.out.push(byte.wrapping_add(carry));
                byte = 0xff;
                self.cache_size -= 1;
                if self.cache_size == 0 {
                    break;
                }
            }
            self.cache = (self.low >> 24) as u8;
        }
        self.cache_size += 1;
        self.low = (self.low & 0x00ff_ffff) << 8;
    }
}

/// Range decoder reading from a compressed byte slice.
#[derive(Debug)]
pub struct RangeDecoder<'a> {
    code: u32,
    range: u32,
    chunk: u32,
    input: &'a [u8],
    pos: usize,
}

impl<'a> RangeDecoder<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        let mut d = Self {
            code: 0,
            range: u32::MAX,
            chunk: 0,
            input,
            pos: 0,
        };
        // The first byte is the encoder's initial cache; its bits fall
        // off the top of the 32-bit code register.
        for _ in 0..5 {
            d.code = (d.code << 8) | u32::from(d.next_byte());
        }
        d
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        let b = self.input.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        b
    }

    /// Returns the target value in `[0, total)` identifying the symbol
    /// whose cumulative slice contains the coded point.
    pub fn decode_target(&mut self, total: u32) -> u32 {
        self.chunk = self.range / total;
        let target = self.code / self.chunk;
        if target >= total {
            total - 1
        } else {
            target
        }
    }

    /// Consumes the slice `[cum, cum + freq)` chosen from the last
    /// [`decode_target`](Self::decode_target) call.
    pub fn advance(&mut self, cum: u32, freq: u32) {
        self.code -= cum * self.chunk;
        self.range = self.chunk * freq;
        while self.range < TOP {
            self.code = (self.code << 8) | u32::from(self.next_byte());
            self.range <<= 8;
        }
    }
}
