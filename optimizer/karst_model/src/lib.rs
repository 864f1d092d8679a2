//! Bytecode program model for the Karst optimizer.
//!
//! This crate provides:
//!
//! - **Interned types** ([`TypeId`], [`TypePool`]) — object and array
//!   types with O(1) identity.
//! - **Class definitions** ([`ClassDef`], [`ClassFlags`]) — super types,
//!   member lists, and provenance flags.
//! - **Members** ([`FieldRef`], [`MethodRef`], [`Proto`]) — interned
//!   references kept separate from definition data, so unresolved
//!   references remain valid identities.
//! - **Instructions** ([`Op`], [`Insn`], [`InsnId`]) — a closed tagged
//!   union of the opcode categories analyses classify.
//! - **Resolution** ([`resolve_field`], [`FieldSearch`]) — reference to
//!   declaration, honoring instance vs. static lookup rules.
//! - **Walkers** ([`walk_fields`], [`walk_methods`], [`walk_opcodes`]) —
//!   single-pass whole-program iteration in deterministic scope order.
//!
//! Analyses consume a [`Program`] read-only; construction is the
//! loader's (or a test fixture's) job.

mod class;
mod insn;
mod member;
mod program;
mod resolver;
mod ty;
mod walk;

pub use class::{ClassDef, ClassFlags};
pub use insn::{Insn, InsnId, Op};
pub use member::{
    FieldData, FieldFlags, FieldRef, FieldRefId, MethodBody, MethodData, MethodFlags, MethodRef,
    MethodRefId, Proto,
};
pub use program::Program;
pub use resolver::{resolve_field, FieldSearch};
pub use ty::{TypeId, TypePool};
pub use walk::{walk_fields, walk_methods, walk_opcodes};
