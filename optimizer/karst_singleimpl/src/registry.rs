//! Candidate records and the registry that owns them.
//!
//! The registry is the single shared state of the analysis: one
//! [`Candidate`] per single-implemented interface, keyed by interface
//! type. Every stage narrows the candidate set (through
//! [`SingleImplAnalysis::escape_interface`], the only mutation path for
//! escape bits) or enriches surviving candidates' use-site inventories.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use karst_model::{FieldRefId, InsnId, MethodRefId, Program, TypeId};

use crate::escape::EscapeReason;

/// Upstream detector handed the analysis a type it promised not to.
///
/// These are caller contract violations, checked eagerly at
/// registration; they abort the analysis rather than escaping a
/// candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no class definition for `{name}` in the analyzed scope")]
    UndefinedClass { name: String },
    #[error("`{name}` is external and cannot be a single-impl candidate")]
    ExternalClass { name: String },
    #[error("`{name}` is an annotation type and cannot be a single-impl candidate")]
    AnnotationClass { name: String },
}

/// Analysis record for one single-implemented interface.
#[derive(Debug)]
pub struct Candidate {
    /// The sole implementing class.
    pub impl_ty: TypeId,
    /// Candidate interfaces that directly extend this one. Hierarchy
    /// bookkeeping only; no ownership implied.
    pub children: FxHashSet<TypeId>,
    /// Disqualifying conditions observed so far; empty means still
    /// optimizable.
    pub escape: EscapeReason,
    /// Field declarations typed with this interface (or an array of it).
    pub field_defs: Vec<FieldRefId>,
    /// Method declarations mentioning this interface in their signature.
    pub method_defs: FxHashSet<MethodRefId>,
    /// Field-access instructions whose field's value type is this
    /// interface.
    pub field_refs: FxHashMap<FieldRefId, Vec<InsnId>>,
    /// Non-interface invocations mentioning this interface in the
    /// target's signature.
    pub method_refs: FxHashMap<MethodRefId, FxHashSet<InsnId>>,
    /// Interface-dispatch invocations on methods declared by this
    /// interface.
    pub intf_method_refs: FxHashMap<MethodRefId, FxHashSet<InsnId>>,
    /// Casts, type tests, and allocations naming this interface.
    pub type_refs: Vec<InsnId>,
}

impl Candidate {
    fn new(impl_ty: TypeId) -> Self {
        Candidate {
            impl_ty,
            children: FxHashSet::default(),
            escape: EscapeReason::empty(),
            field_defs: Vec::new(),
            method_defs: FxHashSet::default(),
            field_refs: FxHashMap::default(),
            method_refs: FxHashMap::default(),
            intf_method_refs: FxHashMap::default(),
            type_refs: Vec::new(),
        }
    }

    pub fn is_escaped(&self) -> bool {
        !self.escape.is_empty()
    }
}

/// The candidate registry. Built once per analysis run, mutated by the
/// sequential stages, then pruned and ordered for the rewriter.
#[derive(Default)]
pub struct SingleImplAnalysis {
    candidates: FxHashMap<TypeId, Candidate>,
}

impl SingleImplAnalysis {
    /// Create one candidate per (interface, implementation) pair.
    ///
    /// Both sides must resolve to internal, non-annotation classes;
    /// anything else is an upstream contract violation and aborts.
    pub fn register(
        &mut self,
        program: &Program,
        single_impl: &FxHashMap<TypeId, TypeId>,
    ) -> Result<(), AnalysisError> {
        for (&intf, &impl_ty) in single_impl {
            check_registrable(program, intf)?;
            check_registrable(program, impl_ty)?;
            self.candidates.insert(intf, Candidate::new(impl_ty));
        }
        Ok(())
    }

    /// Record, on every candidate, which known interfaces directly
    /// extend it.
    pub fn link_children(&mut self, program: &Program, interfaces: &FxHashSet<TypeId>) {
        for &intf in interfaces {
            let Some(cls) = program.class(intf) else {
                continue;
            };
            for &sup in &cls.interfaces {
                if let Some(candidate) = self.candidates.get_mut(&sup) {
                    candidate.children.insert(intf);
                }
            }
        }
    }

    /// Mark `intf` escaped with `reason` and propagate the reason to
    /// every super-interface it transitively extends.
    ///
    /// Propagation is upward only: rewriting an ancestor must stay
    /// consistent with all descendants, so a disqualified sub-interface
    /// disqualifies its ancestors, never the reverse. Interfaces without
    /// a candidate are passed through so candidate ancestors still
    /// escape. A visited set guards against cycles in malformed input.
    pub fn escape_interface(&mut self, program: &Program, intf: TypeId, reason: EscapeReason) {
        let mut visited = FxHashSet::default();
        self.escape_rec(program, intf, reason, &mut visited);
    }

    fn escape_rec(
        &mut self,
        program: &Program,
        intf: TypeId,
        reason: EscapeReason,
        visited: &mut FxHashSet<TypeId>,
    ) {
        if !visited.insert(intf) {
            return;
        }
        if let Some(candidate) = self.candidates.get_mut(&intf) {
            candidate.escape |= reason;
            tracing::debug!(
                intf = %program.pool.display_name(intf),
                ?reason,
                escape = ?candidate.escape,
                "escaped interface"
            );
        }
        if let Some(cls) = program.class(intf) {
            for &sup in &cls.interfaces {
                self.escape_rec(program, sup, reason, visited);
            }
        }
    }

    /// The candidate for `ty`, or for its innermost element type if
    /// `ty` is an array. In the array case the candidate additionally
    /// escapes with [`EscapeReason::HAS_ARRAY_TYPE`], since element
    /// identity through arrays is not tracked.
    pub(crate) fn get_and_check_single_impl(
        &mut self,
        program: &Program,
        ty: TypeId,
    ) -> Option<TypeId> {
        if self.candidates.contains_key(&ty) {
            return Some(ty);
        }
        if program.pool.is_array(ty) {
            let elem = program.pool.leaf_element(ty);
            if self.candidates.contains_key(&elem) {
                self.escape_interface(program, elem, EscapeReason::HAS_ARRAY_TYPE);
                return Some(elem);
            }
        }
        None
    }

    /// Drop every escaped candidate. After this, `escape` is empty for
    /// every remaining candidate.
    pub fn remove_escaped(&mut self) {
        self.candidates.retain(|_, candidate| !candidate.is_escaped());
    }

    /// One safe optimization batch: leaf candidates only (no candidate
    /// sub-interfaces), ordered ascending by the implementation's
    /// virtual-method count, ties broken by interface name.
    ///
    /// Callers folding multiple batches re-link children after each
    /// batch, since removing a leaf can expose a new leaf.
    pub fn optimizable_interfaces(&self, program: &Program) -> Vec<TypeId> {
        let mut out: Vec<TypeId> = self
            .candidates
            .iter()
            .filter(|(_, candidate)| {
                debug_assert!(!candidate.is_escaped());
                candidate.children.is_empty()
            })
            .map(|(&intf, _)| intf)
            .collect();
        let vmethod_count = |intf: TypeId| {
            self.candidates
                .get(&intf)
                .and_then(|candidate| program.class(candidate.impl_ty))
                .map_or(0, |cls| cls.vmethods.len())
        };
        out.sort_by(|&a, &b| {
            vmethod_count(a).cmp(&vmethod_count(b)).then_with(|| {
                let name_a = program.pool.object_name(a).unwrap_or_default();
                let name_b = program.pool.object_name(b).unwrap_or_default();
                name_a.cmp(name_b)
            })
        });
        out
    }

    pub fn candidate(&self, intf: TypeId) -> Option<&Candidate> {
        self.candidates.get(&intf)
    }

    pub(crate) fn candidate_mut(&mut self, intf: TypeId) -> Option<&mut Candidate> {
        self.candidates.get_mut(&intf)
    }

    pub fn candidates(&self) -> impl Iterator<Item = (TypeId, &Candidate)> {
        self.candidates.iter().map(|(&intf, candidate)| (intf, candidate))
    }

    /// Candidate interface types, snapshotted so stages can iterate
    /// while escaping.
    pub(crate) fn interfaces(&self) -> Vec<TypeId> {
        self.candidates.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn check_registrable(program: &Program, ty: TypeId) -> Result<(), AnalysisError> {
    let Some(cls) = program.class(ty) else {
        return Err(AnalysisError::UndefinedClass {
            name: program.pool.display_name(ty),
        });
    };
    if cls.is_external() {
        return Err(AnalysisError::ExternalClass {
            name: program.pool.display_name(ty),
        });
    }
    if cls.is_annotation() {
        return Err(AnalysisError::AnnotationClass {
            name: program.pool.display_name(ty),
        });
    }
    Ok(())
}
