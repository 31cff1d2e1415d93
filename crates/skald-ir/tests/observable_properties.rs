//! Property tests for observable parsing and symplectic encoding.

use proptest::prelude::*;
use skald_ir::{Observable, PauliOp};

fn pauli_word(width: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['I', 'X', 'Y', 'Z']), width)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn parsed_labels_match_input(
        width in 1usize..6,
        seed_terms in 1usize..6,
        coef in -10.0f64..10.0,
    ) {
        let words: Vec<String> = (0..seed_terms)
            .map(|i| {
                let letters = ['I', 'X', 'Y', 'Z'];
                (0..width).map(|q| letters[(i + q * 3) % 4]).collect()
            })
            .collect();
        let text = words
            .iter()
            .map(|w| format!("{coef} {w}"))
            .collect::<Vec<_>>()
            .join(" + ");

        let obs: Observable = text.parse().unwrap();
        prop_assert_eq!(obs.n_terms(), words.len());
        for (term, word) in obs.terms().iter().zip(&words) {
            prop_assert_eq!(&term.label(), word);
            prop_assert_eq!(term.symplectic.len(), 2 * width);
            prop_assert!((term.coefficient.re - coef).abs() < 1e-9);
        }
    }

    #[test]
    fn symplectic_bits_decode_to_word(word in (1usize..8).prop_flat_map(pauli_word)) {
        let obs: Observable = word.parse().unwrap();
        let term = &obs.terms()[0];
        let n = term.num_qubits();
        for (q, c) in word.chars().enumerate() {
            let op = PauliOp::from_bits(term.symplectic[q], term.symplectic[q + n]);
            let expected = match c {
                'I' => PauliOp::I,
                'X' => PauliOp::X,
                'Y' => PauliOp::Y,
                _ => PauliOp::Z,
            };
            prop_assert_eq!(op, expected);
        }
        prop_assert_eq!(term.is_identity(), word.chars().all(|c| c == 'I'));
    }
}
