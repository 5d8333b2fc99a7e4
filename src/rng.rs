/// Small seeded generator so a session replays identically from its seed.
#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }

    /// Uniform value in `[min, max]`; collapses to `min` for an empty range.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next_f32() * (max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::Rng;

    #[test]
    fn same_seed_yields_same_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn range_stays_within_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..1_000 {
            let value = rng.range_f32(6.0, 9.0);
            assert!((6.0..=9.0).contains(&value), "value out of range: {value}");
        }
        assert_eq!(rng.range_f32(5.0, 5.0), 5.0);
        assert_eq!(rng.range_f32(5.0, 1.0), 5.0);
    }
}
