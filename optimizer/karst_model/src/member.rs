//! Field and method references and definitions.
//!
//! A *reference* is the (owner, name, type/proto) triple an instruction
//! names; it is interned and may or may not have a matching *definition*
//! in the analyzed program. Keeping the two apart lets resolution failure
//! be an ordinary `None` rather than an error: an unresolved reference is
//! still a valid identity to record use sites against.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::insn::Insn;
use crate::ty::TypeId;

/// Interned identity of a field reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldRefId(u32);

impl FieldRefId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        FieldRefId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned identity of a method reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRefId(u32);

impl MethodRefId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        MethodRefId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A field reference: owner class, field name, value type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub owner: TypeId,
    pub name: Box<str>,
    pub ty: TypeId,
}

/// A method prototype: return type plus parameter types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Proto {
    pub ret: TypeId,
    pub args: SmallVec<[TypeId; 4]>,
}

impl Proto {
    pub fn new(ret: TypeId, args: impl IntoIterator<Item = TypeId>) -> Self {
        Proto {
            ret,
            args: args.into_iter().collect(),
        }
    }

    /// Return type followed by every parameter type.
    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::once(self.ret).chain(self.args.iter().copied())
    }
}

/// A method reference: owner class, method name, prototype.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub owner: TypeId,
    pub name: Box<str>,
    pub proto: Proto,
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FieldFlags: u8 {
        const STATIC = 1 << 0;
    }
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u8 {
        const STATIC = 1 << 0;
        /// Implemented behind a foreign ABI; its body is invisible and
        /// unrewritable.
        const NATIVE = 1 << 1;
        const CONSTRUCTOR = 1 << 2;
    }
}

/// Definition data for a declared field.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldData {
    pub flags: FieldFlags,
}

/// Definition data for a declared method.
#[derive(Debug, Default)]
pub struct MethodData {
    pub flags: MethodFlags,
    /// Absent for native and abstract methods.
    pub body: Option<MethodBody>,
}

impl MethodData {
    pub fn is_native(&self) -> bool {
        self.flags.contains(MethodFlags::NATIVE)
    }
}

/// Instruction sequence of a concrete method.
#[derive(Debug, Default)]
pub struct MethodBody {
    pub insns: Vec<Insn>,
}
