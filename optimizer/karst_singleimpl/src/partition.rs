//! Load-partition consistency.

use rustc_hash::FxHashSet;

use karst_model::{Program, TypeId};

use crate::escape::EscapeReason;
use crate::registry::SingleImplAnalysis;

/// Escape candidates whose interface sits in the primary load partition
/// while the sole implementation does not. Folding them would force the
/// implementation to load eagerly, a loading-order change outside this
/// analysis's authority.
pub(crate) fn escape_not_in_primary(
    analysis: &mut SingleImplAnalysis,
    program: &Program,
    primary: &FxHashSet<TypeId>,
) {
    for intf in analysis.interfaces() {
        if !primary.contains(&intf) {
            continue;
        }
        let impl_ty = match analysis.candidate(intf) {
            Some(candidate) => candidate.impl_ty,
            None => continue,
        };
        if !primary.contains(&impl_ty) {
            analysis.escape_interface(program, intf, EscapeReason::NOT_IN_PRIMARY);
        }
    }
}
