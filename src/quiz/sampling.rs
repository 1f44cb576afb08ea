//! Choosing which questions make up a run.

use rand::Rng;
use rand::seq::SliceRandom;

use super::bank::QuestionBank;
use crate::models::Question;

pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// The group a run draws its questions from.
///
/// A subcategory filter never looks at the category field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Category(String),
    Subcategory(String),
}

impl Filter {
    pub fn label(&self) -> &str {
        match self {
            Filter::Category(name) | Filter::Subcategory(name) => name,
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        match self {
            Filter::Category(name) => question.category == *name,
            Filter::Subcategory(name) => question.subcategory.as_deref() == Some(name.as_str()),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, Filter::Category(_))
    }
}

/// Absolute positions of every question matching `filter`, in store order.
pub fn pool(bank: &QuestionBank, filter: &Filter) -> Vec<usize> {
    bank.questions()
        .iter()
        .enumerate()
        .filter(|(_, q)| filter.matches(q))
        .map(|(index, _)| index)
        .collect()
}

/// Draws up to `size` entries from `pool`.
///
/// Larger pools go through a partial Fisher-Yates shuffle so every entry is
/// equally likely in every drawn slot. Pools that already fit keep their
/// order unless `shuffle_small` is set.
pub fn sample<R: Rng + ?Sized>(
    mut pool: Vec<usize>,
    size: usize,
    shuffle_small: bool,
    rng: &mut R,
) -> Vec<usize> {
    if pool.len() > size {
        let (drawn, _) = pool.partial_shuffle(rng, size);
        return drawn.to_vec();
    }

    if shuffle_small {
        pool.shuffle(rng);
    }
    pool
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{question, sized_bank};

    #[test]
    fn test_large_pool_draws_sample_size_without_duplicates() {
        let bank = sized_bank(15, &[]);
        let filter = Filter::Category("監査論".to_string());
        let members: HashSet<usize> = pool(&bank, &filter).into_iter().collect();
        assert_eq!(members.len(), 15);

        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let drawn = sample(pool(&bank, &filter), DEFAULT_SAMPLE_SIZE, false, &mut rng);
            assert_eq!(drawn.len(), 10);
            let unique: HashSet<usize> = drawn.iter().copied().collect();
            assert_eq!(unique.len(), 10);
            assert!(unique.is_subset(&members));
        }
    }

    #[test]
    fn test_every_member_can_be_drawn_first() {
        let pool_entries: Vec<usize> = (0..12).collect();
        let mut firsts = HashSet::new();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let drawn = sample(pool_entries.clone(), 10, false, &mut rng);
            firsts.insert(drawn[0]);
        }
        assert_eq!(firsts.len(), 12);
    }

    #[test]
    fn test_small_pool_is_kept_whole_and_ordered() {
        let bank = sized_bank(4, &[("資産", 3)]);
        let filter = Filter::Subcategory("資産".to_string());
        let entries = pool(&bank, &filter);
        assert_eq!(entries.len(), 3);

        let mut rng = SmallRng::seed_from_u64(1);
        let drawn = sample(entries.clone(), DEFAULT_SAMPLE_SIZE, false, &mut rng);
        assert_eq!(drawn, entries);
    }

    #[test]
    fn test_small_pool_shuffle_keeps_members() {
        let entries: Vec<usize> = (0..8).collect();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut drawn = sample(entries.clone(), DEFAULT_SAMPLE_SIZE, true, &mut rng);
        drawn.sort_unstable();
        assert_eq!(drawn, entries);
    }

    #[test]
    fn test_subcategory_filter_ignores_category() {
        let bank = QuestionBank::new(vec![
            question("a", "資産", None),
            question("b", "勘定科目等", Some("資産")),
        ]);
        assert_eq!(pool(&bank, &Filter::Subcategory("資産".to_string())), [1]);
        assert_eq!(pool(&bank, &Filter::Category("資産".to_string())), [0]);
    }

    #[test]
    fn test_empty_pool() {
        let bank = sized_bank(3, &[]);
        let entries = pool(&bank, &Filter::Category("財務会計論".to_string()));
        assert!(entries.is_empty());
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(sample(entries, DEFAULT_SAMPLE_SIZE, true, &mut rng).is_empty());
    }
}
