//! Instruction representation.
//!
//! `Op` is a closed tagged union over the opcode categories a
//! whole-program analysis distinguishes: each variant carries exactly the
//! type, field, or method operand the category names. Opcodes with no
//! such operand (arithmetic, moves, branches, ...) collapse into
//! [`Op::Other`]. Analyses that need them would extend the union, and
//! `match` exhaustiveness flags every site that must be revisited.

use crate::member::{FieldRefId, MethodRefId};
use crate::ty::TypeId;

/// Program-wide instruction identity.
///
/// Assigned when a method body is attached to the program; use-site
/// inventories key on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InsnId(u32);

impl InsnId {
    pub(crate) fn new(index: u32) -> Self {
        InsnId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One opcode, reduced to its analysis-relevant operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Class-literal load: the type's identity becomes a runtime value.
    ConstClass(TypeId),

    // Type-test, cast, and allocation opcodes.
    CheckCast(TypeId),
    InstanceOf(TypeId),
    NewInstance(TypeId),
    NewArray(TypeId),
    FilledNewArray(TypeId),

    // Field access opcodes.
    InstanceGet(FieldRefId),
    InstancePut(FieldRefId),
    StaticGet(FieldRefId),
    StaticPut(FieldRefId),

    // Invocation opcodes.
    InvokeInterface(MethodRefId),
    InvokeVirtual(MethodRefId),
    InvokeDirect(MethodRefId),
    InvokeStatic(MethodRefId),
    InvokeSuper(MethodRefId),

    /// Any opcode with no type, field, or method operand.
    Other,
}

/// An instruction: identity plus opcode.
#[derive(Clone, Copy, Debug)]
pub struct Insn {
    pub id: InsnId,
    pub op: Op,
}
