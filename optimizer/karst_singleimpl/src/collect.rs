//! Reference collector.
//!
//! One pass each over field declarations, method signatures, and
//! instructions. Every instruction is classified exactly once; field
//! accesses and invocations share the same signature-matching helpers so
//! both get symmetric treatment. Unresolved field references are used
//! as-is: strictly more conservative, since a use site can never be
//! under-collected.

use karst_model::{
    resolve_field, walk_fields, walk_methods, walk_opcodes, FieldRefId, FieldSearch, InsnId,
    MethodRefId, Op, Program,
};

use crate::escape::EscapeReason;
use crate::registry::SingleImplAnalysis;

/// Record every field declared with a candidate interface type (or an
/// array of it, which also escapes the candidate).
pub(crate) fn collect_field_defs(analysis: &mut SingleImplAnalysis, program: &Program) {
    walk_fields(program, |_cls, fref| {
        let ty = program.field(fref).ty;
        if let Some(intf) = analysis.get_and_check_single_impl(program, ty) {
            if let Some(candidate) = analysis.candidate_mut(intf) {
                candidate.field_defs.push(fref);
            }
        }
    });
}

/// Record every method whose signature mentions a candidate interface.
///
/// Native methods escape the candidate: native code cannot be rewritten
/// to a different type. Methods declared on the matched interface itself
/// escape it too: folding the type would change the declaring class of
/// its own signature.
pub(crate) fn collect_method_defs(analysis: &mut SingleImplAnalysis, program: &Program) {
    walk_methods(program, |mref, data| {
        let native = data.is_native();
        let owner = program.method(mref).owner;
        for ty in program.method(mref).proto.types() {
            let Some(intf) = analysis.get_and_check_single_impl(program, ty) else {
                continue;
            };
            if native {
                analysis.escape_interface(program, intf, EscapeReason::NATIVE_METHOD);
            }
            if owner == intf {
                analysis.escape_interface(program, intf, EscapeReason::SELF_REFERENCE);
            }
            if let Some(candidate) = analysis.candidate_mut(intf) {
                candidate.method_defs.insert(mref);
            }
        }
    });
}

/// Classify every instruction that names a candidate interface through
/// a type, field, or method operand.
pub(crate) fn analyze_opcodes(analysis: &mut SingleImplAnalysis, program: &Program) {
    walk_opcodes(program, |_method, insn| match insn.op {
        // A class literal can be used as a lookup key by a mechanism
        // the analysis cannot see through (dependency injection and
        // friends), so its interface is dropped outright.
        Op::ConstClass(ty) => {
            if let Some(intf) = analysis.get_and_check_single_impl(program, ty) {
                analysis.escape_interface(program, intf, EscapeReason::CONST_CLASS);
            }
        }
        Op::CheckCast(ty)
        | Op::InstanceOf(ty)
        | Op::NewInstance(ty)
        | Op::NewArray(ty)
        | Op::FilledNewArray(ty) => {
            if let Some(intf) = analysis.get_and_check_single_impl(program, ty) {
                if let Some(candidate) = analysis.candidate_mut(intf) {
                    candidate.type_refs.push(insn.id);
                }
            }
        }
        Op::InstanceGet(fref) | Op::InstancePut(fref) => {
            let field = resolve_field(program, fref, FieldSearch::Instance).unwrap_or(fref);
            check_field(analysis, program, field, insn.id);
        }
        Op::StaticGet(fref) | Op::StaticPut(fref) => {
            let field = resolve_field(program, fref, FieldSearch::Static).unwrap_or(fref);
            check_field(analysis, program, field, insn.id);
        }
        Op::InvokeInterface(mref) => {
            let owner = program.method(mref).owner;
            if let Some(intf) = analysis.get_and_check_single_impl(program, owner) {
                // A target not literally declared on the interface is an
                // inherited/default method the model misses.
                let declared = program
                    .class(intf)
                    .is_some_and(|cls| cls.vmethods.contains(&mref));
                if declared {
                    if let Some(candidate) = analysis.candidate_mut(intf) {
                        candidate
                            .intf_method_refs
                            .entry(mref)
                            .or_default()
                            .insert(insn.id);
                    }
                } else {
                    analysis.escape_interface(program, intf, EscapeReason::UNKNOWN_MREF);
                }
            }
            check_sig(analysis, program, mref, insn.id);
        }
        Op::InvokeVirtual(mref)
        | Op::InvokeDirect(mref)
        | Op::InvokeStatic(mref)
        | Op::InvokeSuper(mref) => {
            check_sig(analysis, program, mref, insn.id);
        }
        Op::Other => {}
    });
}

/// Record an invocation under every candidate its target's signature
/// mentions.
fn check_sig(
    analysis: &mut SingleImplAnalysis,
    program: &Program,
    mref: MethodRefId,
    insn: InsnId,
) {
    for ty in program.method(mref).proto.types() {
        if let Some(intf) = analysis.get_and_check_single_impl(program, ty) {
            if let Some(candidate) = analysis.candidate_mut(intf) {
                candidate.method_refs.entry(mref).or_default().insert(insn);
            }
        }
    }
}

/// A field whose declaring class is a candidate interface escapes it:
/// no field can be meaningfully declared on an interface under this
/// optimization. A field whose value type is a candidate is recorded.
fn check_field(
    analysis: &mut SingleImplAnalysis,
    program: &Program,
    field: FieldRefId,
    insn: InsnId,
) {
    let owner = program.field(field).owner;
    if let Some(intf) = analysis.get_and_check_single_impl(program, owner) {
        analysis.escape_interface(program, intf, EscapeReason::HAS_FIELD_REF);
    }
    let ty = program.field(field).ty;
    if let Some(intf) = analysis.get_and_check_single_impl(program, ty) {
        if let Some(candidate) = analysis.candidate_mut(intf) {
            candidate.field_refs.entry(field).or_default().push(insn);
        }
    }
}

#[cfg(test)]
mod tests;
