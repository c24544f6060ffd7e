//! Property-based tests for bandsearch.
//!
//! These verify invariants that hold regardless of input:
//! - cosine similarity stays in [-1, 1] and honors its zero conventions
//! - hashing is deterministic and inserts are always retrievable
//! - search output is sorted, truncated, and matches brute force on fallback
//! - PCA output has the requested shape

use bandsearch::{
    cosine_similarity, Item, LshIndex, LshParams, PcaConfig, PcaReducer, Similarity, VectorStore,
};
use proptest::prelude::*;

prop_compose! {
    fn arb_vector(dim: usize)(vec in prop::collection::vec(-10.0f32..10.0, dim)) -> Vec<f32> {
        vec
    }
}

prop_compose! {
    fn arb_unit_box(dim: usize)(vec in prop::collection::vec(0.0f32..1.0, dim)) -> Vec<f32> {
        vec
    }
}

prop_compose! {
    fn arb_batch(max_n: usize, dim: usize)
        (vecs in prop::collection::vec(arb_unit_box(dim), 1..max_n)) -> Vec<Vec<f32>> {
        vecs
    }
}

fn arb_params() -> impl Strategy<Value = LshParams> {
    (1usize..8, 1usize..6, 1usize..5, any::<u64>()).prop_map(|(t, b, s, seed)| {
        LshParams::new(t, b, s).with_seed(seed)
    })
}

mod similarity_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn bounded(a in arb_vector(16), b in arb_vector(16)) {
            let s = cosine_similarity(&a, &b).value();
            prop_assert!((-1.0..=1.0).contains(&s), "similarity {} out of range", s);
        }

        #[test]
        fn symmetric(a in arb_vector(16), b in arb_vector(16)) {
            let ab = cosine_similarity(&a, &b).value();
            let ba = cosine_similarity(&b, &a).value();
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn self_similarity_is_one(a in arb_vector(16)) {
            let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            prop_assume!(norm > 1e-3);
            let s = cosine_similarity(&a, &a).value();
            prop_assert!((s - 1.0).abs() < 1e-5, "self similarity {}", s);
        }

        #[test]
        fn zero_vector_scores_zero(a in arb_vector(12)) {
            prop_assert_eq!(cosine_similarity(&a, &[0.0; 12]), Similarity::ZERO);
        }

        #[test]
        fn length_mismatch_scores_zero(a in arb_vector(8), b in arb_vector(9)) {
            prop_assert_eq!(cosine_similarity(&a, &b), Similarity::ZERO);
        }
    }
}

mod hash_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn hashing_is_deterministic(params in arb_params(), v in arb_unit_box(24)) {
            let a = LshIndex::new(params).unwrap();
            let b = LshIndex::new(params).unwrap();
            for t in 0..params.num_tables {
                prop_assert_eq!(a.hash(&v, t), a.hash(&v, t));
                prop_assert_eq!(a.hash(&v, t), b.hash(&v, t));
            }
        }

        #[test]
        fn every_insert_is_in_its_bucket_in_every_table(
            params in arb_params(),
            batch in arb_batch(30, 10),
        ) {
            let mut index = LshIndex::new(params).unwrap();
            for (i, v) in batch.iter().enumerate() {
                index.insert(i, v);
            }
            for (i, v) in batch.iter().enumerate() {
                for t in 0..params.num_tables {
                    let hits = index.bucket(t, &index.hash(v, t).unwrap()).iter().filter(|&&p| p == i).count();
                    prop_assert_eq!(hits, 1);
                }
                prop_assert!(index.candidates(v).contains(&i));
            }
        }
    }
}

mod search_props {
    use super::*;

    fn store_from(params: LshParams, batch: &[Vec<f32>]) -> VectorStore {
        let mut store = VectorStore::with_params(params).unwrap();
        for (i, v) in batch.iter().enumerate() {
            store.add(Item::new(i as u64, v.clone(), ()));
        }
        store
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn sorted_and_truncated(
            params in arb_params(),
            batch in arb_batch(40, 8),
            query in arb_unit_box(8),
            k in 0usize..50,
        ) {
            let store = store_from(params, &batch);
            let (results, stats) = store.search_with_stats(&query, k);

            prop_assert_eq!(results.len(), k.min(stats.scored));
            for w in results.windows(2) {
                prop_assert!(w[0].similarity >= w[1].similarity);
            }
            if k > 0 {
                prop_assert!(!results.is_empty(), "non-empty store returned nothing");
            }
        }

        #[test]
        fn scores_are_exact_cosine(
            params in arb_params(),
            batch in arb_batch(20, 6),
            query in arb_unit_box(6),
        ) {
            let store = store_from(params, &batch);
            for r in store.search(&query, batch.len()) {
                prop_assert_eq!(r.similarity, cosine_similarity(&query, &r.item.vector));
            }
        }

        #[test]
        fn fallback_matches_brute_force(
            params in arb_params(),
            batch in arb_batch(20, 6),
            query in arb_unit_box(6),
            k in 1usize..25,
        ) {
            let store = store_from(params, &batch);
            let (results, stats) = store.search_with_stats(&query, k);
            if stats.fell_back {
                let exact = store.search_exact(&query, k);
                let got: Vec<Similarity> = results.iter().map(|r| r.similarity).collect();
                let want: Vec<Similarity> = exact.iter().map(|r| r.similarity).collect();
                prop_assert_eq!(got, want);
                prop_assert_eq!(stats.scored, batch.len());
            } else {
                prop_assert!(stats.scored == stats.candidates);
            }
        }

        #[test]
        fn approximate_top1_never_beats_exact(
            params in arb_params(),
            batch in arb_batch(20, 6),
            query in arb_unit_box(6),
        ) {
            let store = store_from(params, &batch);
            let approx = store.search(&query, 1);
            let exact = store.search_exact(&query, 1);
            prop_assert!(approx[0].similarity <= exact[0].similarity);
        }
    }
}

mod pca_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn output_shape(
            batch in (2usize..8).prop_flat_map(|dim| prop::collection::vec(arb_unit_box(dim), 2..12)),
            k_frac in 0.0f64..1.0,
            seed in any::<u64>(),
        ) {
            let dim = batch[0].len();
            let k = ((dim as f64) * k_frac) as usize; // always < dim
            let reducer = PcaReducer::new(PcaConfig::default().with_seed(seed));
            let reduced = reducer.reduce(&batch, k).unwrap();
            prop_assert_eq!(reduced.len(), batch.len());
            for v in &reduced {
                prop_assert_eq!(v.len(), k);
                prop_assert!(v.iter().all(|x| x.is_finite()));
            }
        }

        #[test]
        fn no_op_at_or_above_source_dim(
            batch in arb_batch(10, 4),
            extra in 0usize..4,
        ) {
            let reduced = PcaReducer::default().reduce(&batch, 4 + extra).unwrap();
            prop_assert_eq!(reduced, batch);
        }
    }
}
