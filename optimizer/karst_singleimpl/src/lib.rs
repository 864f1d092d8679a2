//! Single-implementation interface escape analysis.
//!
//! An interface implemented by exactly one class is a folding candidate:
//! every use of the interface type could be rewritten to the
//! implementation, and the interface deleted. This crate decides,
//! conservatively, which candidates are safe — it does **not** perform
//! the rewrite. For each candidate it either records a complete use-site
//! inventory for the downstream rewriter, or an *escape*: a bitmask of
//! the disqualifying conditions observed (see [`EscapeReason`]).
//!
//! # Pipeline
//!
//! [`analyze`] runs a strictly sequential pipeline over one shared
//! [`SingleImplAnalysis`] registry:
//!
//! 1. **Register** candidates from the upstream interface→implementation
//!    map; contract violations (external or annotation types) abort.
//! 2. **Link children** so escapes can propagate upward through the
//!    interface-extension hierarchy.
//! 3. **Structural validators** — unknown ancestors, static-dispatch
//!    methods, static fields, allow/deny lists, do-not-strip markers.
//! 4. **Reference collection** — one pass over every field declaration,
//!    method signature, and instruction, recording use sites on
//!    surviving candidates and escaping on unsafe patterns.
//! 5. **Partition check** — primary-partition interfaces whose
//!    implementation lives elsewhere.
//! 6. **Prune** escaped candidates; the survivors' worklist comes from
//!    [`SingleImplAnalysis::optimizable_interfaces`].
//!
//! Escapes propagate *upward only*: disqualifying a sub-interface
//! disqualifies every interface it extends, never the reverse.
//!
//! The analysis is a pure function of (program, map, config): no I/O,
//! no parallelism, no retained state across runs. Escape events are
//! reported through `tracing` for diagnostics only.

mod collect;
mod config;
mod escape;
mod partition;
mod registry;
mod validators;

#[cfg(test)]
mod test_util;

use rustc_hash::{FxHashMap, FxHashSet};

use karst_model::{Program, TypeId};

pub use config::SingleImplConfig;
pub use escape::EscapeReason;
pub use registry::{AnalysisError, Candidate, SingleImplAnalysis};

/// Run the whole analysis.
///
/// `single_impl` and `interfaces` come from the upstream
/// single-implementation detector; `primary` is the set of classes in
/// the primary load partition. The returned registry holds only
/// surviving candidates (escape bitmask empty), each with its complete
/// use-site inventory.
pub fn analyze(
    program: &Program,
    primary: &FxHashSet<TypeId>,
    single_impl: &FxHashMap<TypeId, TypeId>,
    interfaces: &FxHashSet<TypeId>,
    config: &SingleImplConfig,
) -> Result<SingleImplAnalysis, AnalysisError> {
    let mut analysis = SingleImplAnalysis::default();
    analysis.register(program, single_impl)?;
    analysis.link_children(program, interfaces);
    run_stages(&mut analysis, program, primary, config);
    analysis.remove_escaped();
    Ok(analysis)
}

/// Every narrowing stage between registration and pruning, in the fixed
/// pipeline order.
pub(crate) fn run_stages(
    analysis: &mut SingleImplAnalysis,
    program: &Program,
    primary: &FxHashSet<TypeId>,
    config: &SingleImplConfig,
) {
    validators::check_impl_hierarchy(analysis, program);
    validators::escape_with_clinit(analysis, program);
    validators::escape_with_sfields(analysis, program);
    validators::filter_single_impl(analysis, program, config);
    validators::filter_do_not_strip(analysis, program);
    collect::collect_field_defs(analysis, program);
    collect::collect_method_defs(analysis, program);
    collect::analyze_opcodes(analysis, program);
    partition::escape_not_in_primary(analysis, program, primary);
}
