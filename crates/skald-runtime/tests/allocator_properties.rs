//! Property tests for the qudit pool.

use proptest::prelude::*;
use skald_runtime::{QuditAllocator, QuditInfo};

#[derive(Debug, Clone)]
enum Op {
    Allocate,
    Release(usize),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![Just(Op::Allocate), (0usize..64).prop_map(Op::Release)],
        0..200,
    )
}

proptest! {
    #[test]
    fn free_and_allocated_partition_the_pool(capacity in 1usize..32, ops in ops()) {
        let mut pool = QuditAllocator::new(capacity);
        let mut held: Vec<QuditInfo> = Vec::new();

        for op in ops {
            match op {
                Op::Allocate => {
                    let lowest_free = (0..capacity).find(|id| !pool.is_allocated(*id));
                    match pool.allocate(2) {
                        Ok(q) => {
                            prop_assert_eq!(Some(q.id), lowest_free);
                            held.push(q);
                        }
                        Err(_) => prop_assert_eq!(held.len(), capacity),
                    }
                }
                Op::Release(pick) => {
                    if held.is_empty() {
                        continue;
                    }
                    let q = held.swap_remove(pick % held.len());
                    prop_assert!(pool.release(&q).is_ok());
                    prop_assert!(pool.release(&q).is_err());
                }
            }
            prop_assert_eq!(pool.num_available() + held.len(), capacity);
            prop_assert_eq!(pool.num_allocated(), held.len());
            prop_assert_eq!(pool.leak_check(), !held.is_empty());
            for q in &held {
                prop_assert!(pool.is_allocated(q.id));
            }
        }
    }
}
