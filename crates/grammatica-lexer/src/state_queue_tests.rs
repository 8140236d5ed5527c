use std::collections::VecDeque;

use proptest::prelude::*;

use crate::StateQueue;

#[test]
fn fifo_order_across_generations() {
    let mut q = StateQueue::new();
    q.add_last(1);
    q.add_last(2);
    q.mark_end();
    q.add_last(3);

    assert_eq!(q.len(), 3);
    assert!(!q.marked());
    assert_eq!(q.remove_first(), Some(1));
    assert_eq!(q.remove_first(), Some(2));
    assert!(q.marked());
    assert_eq!(q.remove_first(), Some(3));
    assert!(q.is_empty());
    assert_eq!(q.remove_first(), None);
}

#[test]
fn mark_end_bumps_generation() {
    let mut q = StateQueue::new();
    assert_eq!(q.generation(), 0);
    q.mark_end();
    q.mark_end();
    assert_eq!(q.generation(), 2);
}

#[test]
fn clear_keeps_nothing() {
    let mut q = StateQueue::with_capacity(4);
    q.add_last(7);
    q.mark_end();
    q.clear();

    assert!(q.is_empty());
    assert!(q.marked());
    assert_eq!(q.cursors(), (0, 0, 0));
}

#[test]
fn compaction_reuses_buffer() {
    let mut q = StateQueue::new();
    for i in 0..4 {
        q.add_last(i);
    }
    q.mark_end();
    assert_eq!(q.remove_first(), Some(0));
    assert_eq!(q.remove_first(), Some(1));
    assert_eq!(q.remove_first(), Some(2));

    q.add_last(4);
    assert_eq!(q.cursors(), (0, 1, 2));
    assert_eq!(q.remove_first(), Some(3));
    assert_eq!(q.remove_first(), Some(4));
}

#[derive(Debug, Clone)]
enum Op {
    Add(u32),
    Remove,
    Mark,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..100).prop_map(Op::Add),
        Just(Op::Remove),
        Just(Op::Mark),
    ]
}

proptest! {
    #[test]
    fn behaves_like_a_fifo(ops in prop::collection::vec(op(), 0..200)) {
        let mut q = StateQueue::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::Add(s) => {
                    q.add_last(s);
                    model.push_back(s);
                }
                Op::Remove => {
                    prop_assert_eq!(q.remove_first(), model.pop_front());
                }
                Op::Mark => q.mark_end(),
            }

            let (first, mark, last) = q.cursors();
            prop_assert!(first <= mark && mark <= last);
            prop_assert_eq!(q.is_empty(), first == last);
            prop_assert_eq!(q.len(), model.len());
        }
    }
}
