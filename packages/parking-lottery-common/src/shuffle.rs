use sha2::{Digest, Sha256};

/// Source of uniform choices for pool planning.
///
/// Implementors only provide `next_below`; `shuffle` is Fisher–Yates on top.
pub trait Shuffler {
    /// A uniformly distributed index in `0..bound`. `bound` is never zero.
    fn next_below(&mut self, bound: usize) -> usize;

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Deterministic SHA-256 counter-mode stream keyed by a 32-byte seed.
///
/// `block_n = sha256(seed || n_be)`; bytes are consumed eight at a time as
/// big-endian u64 words.
#[derive(Clone, Debug)]
pub struct Sha256Shuffler {
    seed: [u8; 32],
    counter: u64,
    block: [u8; 32],
    offset: usize,
}

impl Sha256Shuffler {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; 32],
            offset: 32,
        }
    }

    /// Seed from arbitrary operator-supplied bytes: `seed = sha256(material)`.
    pub fn from_material(material: &[u8]) -> Self {
        Self::new(Sha256::digest(material).into())
    }

    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed)
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter += 1;
        self.offset = 0;
    }

    fn next_u64(&mut self) -> u64 {
        if self.offset + 8 > self.block.len() {
            self.refill();
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.block[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_be_bytes(word)
    }
}

impl Shuffler for Sha256Shuffler {
    fn next_below(&mut self, bound: usize) -> usize {
        let bound = bound as u64;
        // Largest multiple of `bound` that fits; draws at or above it are
        // rejected so every residue is equally likely.
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let value = self.next_u64();
            if value < zone {
                return (value % bound) as usize;
            }
        }
    }
}
