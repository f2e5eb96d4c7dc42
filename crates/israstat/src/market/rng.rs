//! Seeded pseudo-randomness local to a single generation call.

/// 32-bit polynomial rolling hash (`h * 31 + unit`) over UTF-16 code units,
/// folded to its absolute value.
pub fn seed_from_str(value: &str) -> u32 {
    value
        .encode_utf16()
        .fold(0_i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Mulberry32: a 32-bit counter generator with an output mixing step.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn from_key(key: &str) -> Self {
        Self::new(seed_from_str(key))
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let seed = self.state;
        let mut t = (seed ^ (seed >> 15)).wrapping_mul(1 | seed);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Uniform integer in `[0, bound)`.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        (self.next_f64() * f64::from(bound)).floor() as u32
    }

    /// Uniform in `[low, low + span)`.
    pub fn next_span(&mut self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }

    /// `items` must be non-empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = (self.next_f64() * items.len() as f64).floor() as usize;
        &items[index.min(items.len() - 1)]
    }
}
