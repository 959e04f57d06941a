//! RNG module - seedable randomness for every random draw the engine makes
//!
//! Group guarantee selection, queue shuffles, item subsets, random level
//! assembly and the hint tie-break all draw from one [`SimpleRng`], so a seed
//! fully determines a level attempt.

/// 32-bit linear congruential generator (Numerical Recipes constants).
///
/// Not cryptographic; only reproducibility matters here.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    const MUL: u32 = 1_664_525;
    const INC: u32 = 1_013_904_223;

    /// Seed 0 is remapped to 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(Self::MUL).wrapping_add(Self::INC);
        self.state
    }

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick one element uniformly at random.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let idx = self.next_range(slice.len() as u32) as usize;
        slice.get(idx)
    }

    /// A random `count`-sized subset of `items`, in random order.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        self.shuffle(&mut pool);
        pool.truncate(count);
        pool
    }

    /// Current state; `SimpleRng::new(rng.seed())` continues the same sequence.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
