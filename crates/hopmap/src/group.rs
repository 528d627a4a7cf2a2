//! Grouping of objects that only support pairwise equality.
//!
//! Hops have no hash or order that respects symmetry equivalence, so grouping
//! is a disjoint-set pass over indices driven by the predicate: at most
//! N(N−1)/2 predicate calls, fine for hop counts in the hundreds.
//!
//! The predicate must be reflexive and symmetric. Transitivity is the caller's
//! contract: a non-transitive predicate silently merges chains `a~b~c` into one
//! group even when `a` and `c` differ.

use petgraph::unionfind::UnionFind;

/// Label `items` so that `labels[i] == labels[j]` iff `comp` connects `i` and `j`
/// (transitively).
///
/// Labels are compact (`0..k`) and numbered in order of first appearance.
pub fn generic_groupby<T, F>(items: &[T], comp: F) -> Vec<usize>
where
    F: Fn(&T, &T) -> bool,
{
    let n = items.len();
    let mut sets = UnionFind::<usize>::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if sets.find_mut(i) == sets.find_mut(j) {
                continue;
            }
            if comp(&items[i], &items[j]) {
                sets.union(i, j);
            }
        }
    }
    let mut root_label = vec![usize::MAX; n];
    let mut next = 0;
    (0..n)
        .map(|i| {
            let r = sets.find_mut(i);
            if root_label[r] == usize::MAX {
                root_label[r] = next;
                next += 1;
            }
            root_label[r]
        })
        .collect()
}
