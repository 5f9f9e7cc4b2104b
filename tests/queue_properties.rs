//! Property tests over randomized push/pop interleavings against the
//! in-process storage engine (bypassing the wire protocol, which has
//! its own focused tests in `queue_protocol.rs`).

use std::collections::VecDeque;
use std::sync::Arc;

use fifod::core::{FreeBlockPool, Queue};
use fifod::core::PopOutcome;
use proptest::prelude::*;

fn new_queue() -> Queue {
    Queue::new(
        b"prop".to_vec().into_boxed_slice(),
        4096,
        4096,
        Arc::new(FreeBlockPool::new(4)),
    )
}

#[derive(Debug, Clone)]
enum Op {
    RPush(u8),
    LPush(u8),
    RPop,
    LPop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::RPush),
        any::<u8>().prop_map(Op::LPush),
        Just(Op::RPop),
        Just(Op::LPop),
    ]
}

proptest! {
    /// `count(Q)` always equals live items in a reference deque driven
    /// by the same operations, and pops only ever return a value the
    /// reference deque also has.
    #[test]
    fn count_matches_reference_model(ops in proptest::collection::vec(op_strategy(), 0..200)) {
        let queue = new_queue();
        let mut reference: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::RPush(v) => {
                    queue.rpush(&[v]).unwrap();
                    reference.push_back(v);
                }
                Op::LPush(v) => {
                    queue.lpush(&[v]).unwrap();
                    reference.push_front(v);
                }
                Op::RPop => {
                    let expected = reference.pop_back();
                    let actual = queue.rpop();
                    match (expected, actual) {
                        (Some(v), PopOutcome::Value(bytes)) => prop_assert_eq!(bytes, vec![v]),
                        (None, PopOutcome::Empty) => {}
                        (expected, actual) => prop_assert!(
                            false,
                            "mismatch: reference={:?} queue={:?}",
                            expected, actual
                        ),
                    }
                }
                Op::LPop => {
                    let expected = reference.pop_front();
                    let actual = queue.lpop();
                    match (expected, actual) {
                        (Some(v), PopOutcome::Value(bytes)) => prop_assert_eq!(bytes, vec![v]),
                        (None, PopOutcome::Empty) => {}
                        (expected, actual) => prop_assert!(
                            false,
                            "mismatch: reference={:?} queue={:?}",
                            expected, actual
                        ),
                    }
                }
            }
            prop_assert_eq!(queue.count(), reference.len());
        }
    }

    /// FIFO law: a run of `rpush` followed by a run of `lpop` returns
    /// values in push order.
    #[test]
    fn fifo_law(values in proptest::collection::vec(any::<u8>(), 0..50)) {
        let queue = new_queue();
        for &v in &values {
            queue.rpush(&[v]).unwrap();
        }
        for &v in &values {
            prop_assert_eq!(queue.lpop(), PopOutcome::Value(vec![v]));
        }
        prop_assert_eq!(queue.lpop(), PopOutcome::Empty);
    }

    /// LIFO-on-same-end law: a run of `rpush` followed by a run of
    /// `rpop` returns values in reverse push order.
    #[test]
    fn lifo_on_same_end_law(values in proptest::collection::vec(any::<u8>(), 0..50)) {
        let queue = new_queue();
        for &v in &values {
            queue.rpush(&[v]).unwrap();
        }
        for &v in values.iter().rev() {
            prop_assert_eq!(queue.rpop(), PopOutcome::Value(vec![v]));
        }
        prop_assert_eq!(queue.rpop(), PopOutcome::Empty);
    }
}
