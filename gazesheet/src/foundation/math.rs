/// 64-bit FNV-1a hasher.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Perceived brightness, `0.299 R + 0.587 G + 0.114 B`, in `0.0..=255.0`.
pub(crate) fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Chroma spread `max(R,G,B) - min(R,G,B)`; zero for pure greys.
pub(crate) fn chroma_spread(r: u8, g: u8, b: u8) -> f32 {
    let hi = r.max(g).max(b);
    let lo = r.min(g).min(b);
    f32::from(hi - lo)
}

/// Fingerprint of an RGBA8 buffer together with its dimensions.
pub(crate) fn fingerprint_rgba8(width: u32, height: u32, data: &[u8]) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u32(width);
    h.write_u32(height);
    h.write_bytes(data);
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
