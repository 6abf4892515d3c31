//! Operation-count minimization.
//!
//! The subtree choice between nested operations and a single `replace` is
//! made during the walk (see [`crate::differ`]) via [`prefer_replace`]; this
//! module also removes `test` operations already implied by an earlier one.

use jdelta_types::{OperationKind, Patch, Pointer};

/// Whether a whole-subtree `replace` beats the nested encoding.
///
/// Ties keep the nested encoding.
pub(crate) fn prefer_replace(nested_ops: usize, replace_ops: usize) -> bool {
    nested_ops > replace_ops
}

/// Drop `test`s implied by an earlier `test` of the same node or one of its
/// ancestors, with no mutation applied in between.
pub(crate) fn prune_redundant_tests(patch: &mut Patch) {
    let mut asserted: Vec<Pointer> = Vec::new();
    let keep: Vec<bool> = patch
        .iter()
        .map(|op| {
            if op.kind != OperationKind::Test {
                asserted.clear();
                return true;
            }
            if asserted.iter().any(|p| p.is_prefix_of(&op.path)) {
                return false;
            }
            asserted.push(op.path.clone());
            true
        })
        .collect();

    let mut keep = keep.into_iter();
    patch.retain(|_| keep.next().unwrap_or(true));
}
