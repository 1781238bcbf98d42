//! Property tests for scoring, re-ranking and reference numbering

use proptest::prelude::*;

use medrag::{cosine_similarity, rerank, Candidate, Hit, ReferenceRegistry};

fn vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, dim)
}

fn vector_pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (1usize..32).prop_flat_map(|dim| (vector(dim), vector(dim)))
}

fn candidates() -> impl Strategy<Value = (Vec<f32>, Vec<Candidate>)> {
    (1usize..8).prop_flat_map(|dim| {
        let books = prop::sample::select(vec!["Harrison", "Braunwald", "Guyton"]);
        let pages = 1u32..4;
        (
            vector(dim),
            prop::collection::vec((vector(dim), books, pages), 0..24).prop_map(|items| {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, (v, book, page))| {
                        Candidate::new(v, format!("chunk {}", i))
                            .with_meta("book", book)
                            .with_meta("page", page)
                    })
                    .collect()
            }),
        )
    })
}

proptest! {
    #[test]
    fn prop_cosine_is_symmetric((a, b) in vector_pair()) {
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() <= 1e-6);
    }

    #[test]
    fn prop_self_similarity_is_one(v in (1usize..32).prop_flat_map(vector)) {
        prop_assume!(v.iter().any(|x| x.abs() > 0.5));
        let score = cosine_similarity(&v, &v).unwrap();
        prop_assert!((score - 1.0).abs() < 1e-4, "score {}", score);
    }

    #[test]
    fn prop_cosine_is_bounded((a, b) in vector_pair()) {
        let score = cosine_similarity(&a, &b).unwrap();
        prop_assert!((-1.0 - 1e-5..=1.0 + 1e-5).contains(&score));
    }

    #[test]
    fn prop_rerank_length_and_order((query, cands) in candidates(), k in 0usize..30) {
        let hits = rerank(&query, &cands, k).unwrap();

        prop_assert_eq!(hits.len(), k.min(cands.len()));
        prop_assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert!(hits.iter().enumerate().all(|(i, h)| h.rank == i + 1));
    }

    #[test]
    fn prop_rerank_is_stable_on_ties(query in vector(4), copies in 2usize..6) {
        prop_assume!(query.iter().any(|x| x.abs() > 0.5));
        let cands: Vec<Candidate> = (0..copies)
            .map(|i| Candidate::new(query.clone(), format!("copy {}", i)))
            .collect();

        let hits = rerank(&query, &cands, copies).unwrap();
        let texts: Vec<String> = hits.into_iter().map(|h| h.chunk).collect();
        let expected: Vec<String> = (0..copies).map(|i| format!("copy {}", i)).collect();
        prop_assert_eq!(texts, expected);
    }

    #[test]
    fn prop_registry_is_bounded_and_deterministic((query, cands) in candidates()) {
        let hits: Vec<Hit> = rerank(&query, &cands, cands.len()).unwrap();
        let first = ReferenceRegistry::build(&hits);
        let second = ReferenceRegistry::build(&hits);

        prop_assert!(first.len() <= hits.len());
        prop_assert_eq!(first.ordered_keys(), second.ordered_keys());

        let indices: Vec<usize> = first
            .ordered_keys()
            .iter()
            .filter_map(|key| first.index_of(key))
            .collect();
        prop_assert_eq!(indices, (1..=first.len()).collect::<Vec<_>>());

        for hit in &hits {
            prop_assert!(first.index_of(&hit.key()).is_some());
        }
    }
}
