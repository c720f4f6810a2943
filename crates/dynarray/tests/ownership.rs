//! Every value handed to the array is dropped exactly once, whichever
//! path removes it.

use std::panic::{catch_unwind, AssertUnwindSafe};

use dynarray::DynArray;
use dynarray_test_utils::{CloneBomb, DropLedger, Tracked};

fn tracked_array(ledger: &DropLedger, n: i32) -> DynArray<Tracked> {
    let mut array = DynArray::new();
    for v in 0..n {
        array.push(ledger.track(v));
    }
    array
}

#[test]
fn drop_releases_every_element() {
    let ledger = DropLedger::new();
    {
        let array = tracked_array(&ledger, 10);
        assert_eq!(array.capacity(), 16);
        assert_eq!(ledger.live(), 10);
    }
    assert_eq!(ledger.created(), 10);
    assert_eq!(ledger.dropped(), 10);
}

#[test]
fn growth_moves_without_dropping() {
    let ledger = DropLedger::new();
    let array = tracked_array(&ledger, 17);
    assert_eq!(array.generation().0, 6);
    assert_eq!(ledger.dropped(), 0);
    drop(array);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn pop_hands_ownership_to_caller() {
    let ledger = DropLedger::new();
    let mut array = tracked_array(&ledger, 3);
    let last = array.pop().unwrap();
    assert_eq!(last.value, 2);
    assert_eq!(ledger.dropped(), 0);
    drop(last);
    assert_eq!(ledger.dropped(), 1);
    drop(array);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn erase_drops_exactly_the_erased_element() {
    let ledger = DropLedger::new();
    let mut array = tracked_array(&ledger, 5);
    array.erase(array.begin() + 2);
    assert_eq!(ledger.dropped(), 1);
    let values: Vec<i32> = array.iter().map(|t| t.value).collect();
    assert_eq!(values, [0, 1, 3, 4]);
    drop(array);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn insert_takes_ownership() {
    let ledger = DropLedger::new();
    let mut array = tracked_array(&ledger, 4);
    array.insert(array.begin(), ledger.track(-1));
    assert_eq!(array.len(), 5);
    assert_eq!(ledger.dropped(), 0);
    drop(array);
    assert_eq!(ledger.created(), 5);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn clear_drops_now_and_keeps_buffer() {
    let ledger = DropLedger::new();
    let mut array = tracked_array(&ledger, 6);
    let generation = array.generation();
    array.clear();
    assert_eq!(ledger.live(), 0);
    assert_eq!(array.capacity(), 8);
    assert_eq!(array.generation(), generation);
    array.push(ledger.track(42));
    assert_eq!(array.generation(), generation);
    drop(array);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn partially_consumed_into_iter_drops_the_rest() {
    let ledger = DropLedger::new();
    let array = tracked_array(&ledger, 5);
    let mut iter = array.into_iter();
    let first = iter.next().unwrap();
    let last = iter.next_back().unwrap();
    assert_eq!((first.value, last.value), (0, 4));
    drop(iter);
    assert_eq!(ledger.dropped(), 3);
    drop((first, last));
    assert_eq!(ledger.live(), 0);
}

#[test]
fn clone_duplicates_every_element() {
    let ledger = DropLedger::new();
    let array = tracked_array(&ledger, 3);
    let copy = array.clone();
    assert_eq!(ledger.created(), 6);
    assert_eq!(copy, array);
    drop(array);
    drop(copy);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn shrink_to_fit_keeps_elements_alive() {
    let ledger = DropLedger::new();
    let mut array = tracked_array(&ledger, 5);
    array.shrink_to_fit();
    assert_eq!(array.capacity(), 5);
    assert_eq!(ledger.dropped(), 0);
    drop(array);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn panicking_clone_leaves_no_leak_or_double_drop() {
    let ledger = DropLedger::new();
    let source = [
        CloneBomb::new(1, 2, &ledger),
        CloneBomb::new(2, 2, &ledger),
        CloneBomb::new(3, 2, &ledger),
    ];
    // Each source value has its own fuse; make the third clone fail by
    // exhausting its fuse first.
    let spent = source[2].clone();
    let spent_again = spent.clone();

    let result = catch_unwind(AssertUnwindSafe(|| DynArray::from(&source[..])));
    assert!(result.is_err());

    drop(spent);
    drop(spent_again);
    drop(source);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn zero_sized_elements() {
    let mut array = DynArray::new();
    for _ in 0..5 {
        array.push(());
    }
    assert_eq!(array.len(), 5);
    assert_eq!(array.capacity(), 8);
    array.erase(array.begin());
    assert_eq!(array.len(), 4);
    assert_eq!(array.into_iter().count(), 4);
}
