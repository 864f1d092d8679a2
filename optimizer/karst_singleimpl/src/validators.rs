//! Structural validators.
//!
//! A fixed sequence of whole-candidate-set checks, each escaping the
//! candidates it proves structurally unsafe. Order matters only in that
//! the allow/deny filter must see every candidate the earlier checks
//! left in place; no validator reads another's reason bits.

use rustc_hash::FxHashSet;

use karst_model::{Program, TypeId};

use crate::config::SingleImplConfig;
use crate::escape::EscapeReason;
use crate::registry::SingleImplAnalysis;

/// Escape candidates whose implementation has an ancestor the analysis
/// cannot see. An unmodeled ancestor could introduce hidden overrides
/// or fields.
pub(crate) fn check_impl_hierarchy(analysis: &mut SingleImplAnalysis, program: &Program) {
    for intf in analysis.interfaces() {
        let impl_ty = match analysis.candidate(intf) {
            Some(candidate) => candidate.impl_ty,
            None => continue,
        };
        if !program.hierarchy_in_scope(impl_ty) {
            analysis.escape_interface(program, intf, EscapeReason::IMPL_PARENT_ESCAPED);
        }
    }
}

/// Escape candidates whose interface declares any static-dispatch
/// method. Interfaces are expected to declare none; any presence
/// (static initializer included) is treated as a correctness risk
/// rather than inspected further.
pub(crate) fn escape_with_clinit(analysis: &mut SingleImplAnalysis, program: &Program) {
    for intf in analysis.interfaces() {
        let has_dmethods = program.class(intf).is_some_and(|cls| !cls.dmethods.is_empty());
        if has_dmethods {
            analysis.escape_interface(program, intf, EscapeReason::CLINIT);
        }
    }
}

/// Escape candidates whose interface declares static fields, and any
/// candidate that is the value type of such a field. Static field
/// initialization order and cross-type visibility are not modeled.
pub(crate) fn escape_with_sfields(analysis: &mut SingleImplAnalysis, program: &Program) {
    for intf in analysis.interfaces() {
        let Some(cls) = program.class(intf) else {
            continue;
        };
        if cls.sfields.is_empty() {
            continue;
        }
        analysis.escape_interface(program, intf, EscapeReason::HAS_SFIELDS);
        for &fref in &cls.sfields {
            let field_ty = program.field(fref).ty;
            if let Some(simpl) = analysis.get_and_check_single_impl(program, field_ty) {
                analysis.escape_interface(program, simpl, EscapeReason::HAS_SFIELDS);
            }
        }
    }
}

/// Apply the allow/deny lists.
///
/// The allow-lists (exact name, then package prefix) build the retained
/// set; the deny-lists then escape every match outside it. A candidate
/// retained by an allow-list can never be escaped by a deny-list.
pub(crate) fn filter_single_impl(
    analysis: &mut SingleImplAnalysis,
    program: &Program,
    config: &SingleImplConfig,
) {
    let mut retained: FxHashSet<TypeId> = FxHashSet::default();
    for intf in analysis.interfaces() {
        let Some(name) = program.pool.object_name(intf) else {
            continue;
        };
        if config.allow_names.iter().any(|n| n == name)
            || config.allow_packages.iter().any(|p| name.starts_with(p.as_str()))
        {
            retained.insert(intf);
        }
    }
    for intf in analysis.interfaces() {
        if retained.contains(&intf) {
            continue;
        }
        let Some(name) = program.pool.object_name(intf) else {
            continue;
        };
        let denied = config.deny_names.iter().any(|n| n == name)
            || config.deny_packages.iter().any(|p| name.starts_with(p.as_str()));
        if denied {
            analysis.escape_interface(program, intf, EscapeReason::FILTERED);
        }
    }
}

/// Escape candidates whose interface must not be removed; something
/// outside the program depends on the type's identity.
pub(crate) fn filter_do_not_strip(analysis: &mut SingleImplAnalysis, program: &Program) {
    for intf in analysis.interfaces() {
        let keep = program.class(intf).is_some_and(|cls| cls.do_not_strip());
        if keep {
            analysis.escape_interface(program, intf, EscapeReason::DO_NOT_STRIP);
        }
    }
}
