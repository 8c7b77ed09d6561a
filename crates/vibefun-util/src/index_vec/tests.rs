use super::*;

define_idx!(TestId);

#[test]
fn push_returns_sequential_indices() {
    let mut v: IndexVec<TestId, &str> = IndexVec::new();
    let a = v.push("a");
    let b = v.push("b");
    assert_eq!(a, TestId(0));
    assert_eq!(b, TestId(1));
}

#[test]
fn index_retrieves_pushed_value() {
    let mut v: IndexVec<TestId, i32> = IndexVec::new();
    let id = v.push(42);
    assert_eq!(v[id], 42);
}

#[test]
fn next_index_predicts_upcoming_push() {
    let mut v: IndexVec<TestId, i32> = IndexVec::new();
    v.push(1);
    let predicted = v.next_index();
    let actual = v.push(2);
    assert_eq!(predicted, actual);
}

#[test]
fn iter_enumerated_pairs_index_with_value() {
    let mut v: IndexVec<TestId, &str> = IndexVec::new();
    v.push("x");
    v.push("y");
    let pairs: Vec<_> = v.iter_enumerated().collect();
    assert_eq!(pairs, vec![(TestId(0), &"x"), (TestId(1), &"y")]);
}

#[test]
#[should_panic]
fn from_usize_panics_past_u32_max() {
    TestId::from_usize(u32::MAX as usize + 1);
}
