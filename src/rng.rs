/// Seeded float stream used to draw the orb's fixed lobe offsets.
///
/// Splitmix-style avalanche mix over 32-bit state: advance by a fixed odd
/// increment, then two multiply-xor-shift rounds before normalizing to
/// [0, 1). The same seed always yields the same sequence, which keeps a
/// given orb's silhouette reproducible across restarts.
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from the host RNG when no seed was configured.
    pub fn from_entropy() -> Self {
        Self::new(fastrand::u32(..))
    }

    /// Next float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x9E37_79B9);
        let mut t = self.state ^ (self.state >> 16);
        t = t.wrapping_mul(0x21F0_AAAD);
        t ^= t >> 15;
        t = t.wrapping_mul(0x735A_2D97);
        t ^= t >> 15;
        (t as f64 / 4_294_967_296.0) as f32
    }

    /// Next angle in [0, 2π).
    pub fn next_angle(&mut self) -> f32 {
        self.next_f32() * std::f32::consts::TAU
    }
}
