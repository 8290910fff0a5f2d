// Top-level comparison API.
//
// Normalizes the caller's ignore list once, diffs the two roots, and
// reports. `Comparison` keeps the diff tree around so failures can say
// exactly which fields diverged.

use crate::diff::{self, DiffTree};
use crate::ignore::{self, IgnoreEntry, IgnoreSpec};
use crate::node::Branch;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of comparing two documents. Borrows both of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison<'a> {
    diff: DiffTree<'a>,
}

impl<'a> Comparison<'a> {
    pub fn is_equal(&self) -> bool {
        self.diff.is_empty()
    }

    pub fn diff(&self) -> &DiffTree<'a> {
        &self.diff
    }

    pub fn into_diff(self) -> DiffTree<'a> {
        self.diff
    }
}

/// `true` when `left` matches `right` on every key of `left` not excluded
/// by `ignore`. Keys only `right` has are not considered.
pub fn equals(left: &Branch, right: &Branch, ignore: &[IgnoreEntry]) -> bool {
    compare(left, right, ignore).is_equal()
}

/// Like [`equals`], keeping the diff tree.
pub fn compare<'a>(left: &'a Branch, right: &'a Branch, ignore: &[IgnoreEntry]) -> Comparison<'a> {
    compare_with_spec(left, right, &ignore::normalize(ignore))
}

/// Compare under an already-normalized spec.
pub fn compare_with_spec<'a>(
    left: &'a Branch,
    right: &'a Branch,
    spec: &IgnoreSpec,
) -> Comparison<'a> {
    let diff = diff::diff(left, right, spec);
    log::debug!(
        "compared {} left keys, {} divergent at top level",
        left.len(),
        diff.len()
    );
    Comparison { diff }
}

/// Panic with a divergence report unless the documents compare equal.
#[track_caller]
pub fn assert_equivalent(left: &Branch, right: &Branch, ignore: &[IgnoreEntry]) {
    let cmp = compare(left, right, ignore);
    if !cmp.is_equal() {
        panic!("documents differ:\n{}", cmp.diff());
    }
}

/// Compare every `(left, right)` pair under one ignore list. Results keep
/// input order.
pub fn compare_all<'a>(
    pairs: &[(&'a Branch, &'a Branch)],
    ignore: &[IgnoreEntry],
) -> Vec<Comparison<'a>> {
    let spec = ignore::normalize(ignore);

    #[cfg(feature = "parallel")]
    let iter = pairs.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = pairs.iter();

    iter.map(|&(l, r)| compare_with_spec(l, r, &spec)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
