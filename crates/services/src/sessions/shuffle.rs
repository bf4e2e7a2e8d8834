use rand::Rng;
use rand::seq::SliceRandom;

/// Uniformly random permutation of `items`; the input is left untouched.
#[must_use]
pub fn shuffle_with<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..20 {
            let input: Vec<u32> = (0..len).collect();
            let mut out = shuffle_with(&input, &mut rng);
            assert_eq!(out.len(), input.len());
            out.sort_unstable();
            assert_eq!(out, input);
        }
    }

    #[test]
    fn shuffle_keeps_duplicates() {
        let input = vec!["a", "b", "a", "c", "a"];
        let mut out = shuffle_with(&input, &mut rand::rng());
        out.sort_unstable();
        assert_eq!(out, vec!["a", "a", "a", "b", "c"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = vec![1, 2, 3, 4, 5];
        let _ = shuffle_with(&input, &mut StdRng::seed_from_u64(1));
        assert_eq!(input, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn every_order_of_three_appears() {
        let mut rng = StdRng::seed_from_u64(42);
        let input = [0, 1, 2];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            seen.insert(shuffle_with(&input, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let input: Vec<u32> = (0..10).collect();
        let first = shuffle_with(&input, &mut StdRng::seed_from_u64(3));
        let second = shuffle_with(&input, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let empty: Vec<u8> = Vec::new();
        assert!(shuffle_with(&empty, &mut rand::rng()).is_empty());
    }
}
