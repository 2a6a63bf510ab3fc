use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

/// Insert-only bloom filter over atomic words.
///
/// Sized once from an expected capacity and target false-positive rate.
/// There is no removal: a set bit may be shared by several keys.
pub struct AtomicBloom {
    words: Vec<AtomicU64>,
    mask: u64,
    num_hashes: usize,
    inserted: AtomicUsize,
}

impl AtomicBloom {
    pub fn new(capacity: usize, fp_rate: f64) -> Self {
        let capacity = capacity.max(1);
        let num_bits = Self::optimal_num_bits(capacity, fp_rate);
        let num_hashes = Self::optimal_num_hashes(capacity, num_bits);
        let num_words = num_bits.div_ceil(64);
        Self {
            words: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
            mask: (num_bits as u64) - 1,
            num_hashes,
            inserted: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn contains<K: Hash + ?Sized>(&self, key: &K) -> bool {
        let (h1, h2) = Self::double_hash(key);
        (0..self.num_hashes as u64).all(|i| {
            let idx = Self::nth_hash(h1, h2, i, self.mask);
            self.words[idx / 64].load(AtomicOrdering::Relaxed) & (1u64 << (idx % 64)) != 0
        })
    }

    #[inline]
    pub fn insert<K: Hash + ?Sized>(&self, key: &K) {
        let (h1, h2) = Self::double_hash(key);
        for i in 0..self.num_hashes as u64 {
            let idx = Self::nth_hash(h1, h2, i, self.mask);
            self.words[idx / 64].fetch_or(1u64 << (idx % 64), AtomicOrdering::Relaxed);
        }
        self.inserted.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Number of insertions, duplicates included.
    pub fn len(&self) -> usize {
        self.inserted.load(AtomicOrdering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_bits(&self) -> usize {
        self.mask as usize + 1
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    #[inline]
    fn double_hash<K: Hash + ?Sized>(key: &K) -> (u64, u64) {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let h1 = hasher.finish();
        let h2 = h1.wrapping_mul(0x517cc1b727220a95).rotate_right(17);
        (h1, h2)
    }

    #[inline]
    fn nth_hash(h1: u64, h2: u64, n: u64, mask: u64) -> usize {
        (h1.wrapping_add(n.wrapping_mul(h2)) & mask) as usize
    }

    fn optimal_num_bits(capacity: usize, fp_rate: f64) -> usize {
        let n = capacity as f64;
        let p = fp_rate;
        let m = (-(n * p.ln()) / (2.0_f64.ln().powi(2))).ceil() as usize;
        m.max(64).next_power_of_two()
    }

    fn optimal_num_hashes(capacity: usize, num_bits: usize) -> usize {
        let n = capacity as f64;
        let m = num_bits as f64;
        (((m / n) * 2.0_f64.ln()).ceil() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_keys_are_members() {
        let bloom = AtomicBloom::new(1_000, 0.001);
        for i in 0..1_000 {
            bloom.insert(&format!("domain{}.example", i));
        }
        for i in 0..1_000 {
            assert!(bloom.contains(&format!("domain{}.example", i)));
        }
        assert_eq!(bloom.len(), 1_000);
    }

    #[test]
    fn test_str_and_string_hash_alike() {
        let bloom = AtomicBloom::new(100, 0.01);
        bloom.insert("ads.example.com");
        assert!(bloom.contains(&"ads.example.com".to_string()));
    }

    #[test]
    fn test_false_positive_rate_near_target() {
        let bloom = AtomicBloom::new(10_000, 0.01);
        for i in 0..10_000 {
            bloom.insert(&format!("in-{}", i));
        }
        let false_positives = (0..10_000)
            .filter(|i| bloom.contains(&format!("out-{}", i)))
            .count();
        // Power-of-two rounding only ever adds bits.
        assert!(false_positives < 300, "got {} false positives", false_positives);
    }

    #[test]
    fn test_sizing_for_default_capacity() {
        let bloom = AtomicBloom::new(500_000, 0.001);
        assert!(bloom.num_bits().is_power_of_two());
        assert!(bloom.num_bits() >= 7_188_794);
        assert!(bloom.num_hashes() >= 10);
        assert!(bloom.is_empty());
    }
}
