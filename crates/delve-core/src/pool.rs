//! Weighted random selection
//!
//! A pool behaves as if every tag were repeated `weight` times in a list
//! and one entry drawn uniformly. It stores cumulative weights instead of
//! the expanded list, which keeps the exact integer ratios.

use crate::errors::GenerationError;
use crate::rng::RandomSource;

/// Weighted pool over a small set of tags
#[derive(Debug, Clone)]
pub struct WeightedPool<T> {
    name: String,
    entries: Vec<T>,
    /// Running total of weights; `cumulative[i]` covers entries `0..=i`
    cumulative: Vec<u64>,
}

impl<T: Clone> WeightedPool<T> {
    /// Build a pool from (tag, weight) pairs. Zero weights are kept out.
    pub fn new(name: impl Into<String>, weights: impl IntoIterator<Item = (T, u32)>) -> Self {
        let mut entries = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0u64;

        for (tag, weight) in weights {
            if weight == 0 {
                continue;
            }
            total += u64::from(weight);
            entries.push(tag);
            cumulative.push(total);
        }

        Self {
            name: name.into(),
            entries,
            cumulative,
        }
    }

    /// Name used in error reports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// True when nothing can be drawn
    pub fn is_empty(&self) -> bool {
        self.total_weight() == 0
    }

    /// Number of drawable tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Draw a tag with probability proportional to its weight
    pub fn sample(&self, rng: &mut RandomSource) -> Result<T, GenerationError> {
        let total = self.total_weight();
        if total == 0 {
            return Err(GenerationError::EmptyPool {
                pool: self.name.clone(),
            });
        }

        let ticket = rng.below(total);

        // First entry whose running total exceeds the ticket
        let idx = self.cumulative.partition_point(|&c| c <= ticket);
        Ok(self.entries[idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_fails() {
        let pool: WeightedPool<char> = WeightedPool::new("letters", vec![('a', 0), ('b', 0)]);
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
        let mut rng = RandomSource::new(1);
        assert_eq!(
            pool.sample(&mut rng),
            Err(GenerationError::EmptyPool {
                pool: "letters".into()
            })
        );
    }

    #[test]
    fn test_single_entry_always_drawn() {
        let pool = WeightedPool::new("one", vec![("only", 7), ("never", 0)]);
        let mut rng = RandomSource::new(2);
        for _ in 0..100 {
            assert_eq!(pool.sample(&mut rng).unwrap(), "only");
        }
    }

    #[test]
    fn test_ratios_converge() {
        let pool = WeightedPool::new("abc", vec![('a', 1), ('b', 3), ('c', 6)]);
        assert_eq!(pool.total_weight(), 10);

        let mut rng = RandomSource::new(42);
        let draws = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            match pool.sample(&mut rng).unwrap() {
                'a' => counts[0] += 1,
                'b' => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }

        for (count, expected) in counts.iter().zip([0.1, 0.3, 0.6]) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "observed {observed}, expected {expected}"
            );
        }
    }
}
