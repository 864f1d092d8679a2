//! Class definitions.

use bitflags::bitflags;

use crate::member::{FieldRefId, MethodRefId};
use crate::ty::TypeId;

bitflags! {
    /// Access and provenance flags on a class definition.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ClassFlags: u8 {
        /// The type is an interface.
        const INTERFACE = 1 << 0;
        /// The type is an annotation interface.
        const ANNOTATION = 1 << 1;
        /// The definition comes from outside the analyzed program and
        /// cannot be transformed.
        const EXTERNAL = 1 << 2;
        /// External dependencies rely on this type's identity; it must
        /// survive optimization untouched.
        const DO_NOT_STRIP = 1 << 3;
    }
}

/// The declaration behind a [`TypeId`].
///
/// Member lists hold canonical references (owner = this class); their
/// definition data lives in the owning [`Program`](crate::Program).
pub struct ClassDef {
    pub ty: TypeId,
    pub super_class: Option<TypeId>,
    /// Direct super-interfaces, in declaration order.
    pub interfaces: Vec<TypeId>,
    pub flags: ClassFlags,
    pub sfields: Vec<FieldRefId>,
    pub ifields: Vec<FieldRefId>,
    /// Static-dispatch methods, constructors included.
    pub dmethods: Vec<MethodRefId>,
    pub vmethods: Vec<MethodRefId>,
}

impl ClassDef {
    pub fn new(ty: TypeId, flags: ClassFlags) -> Self {
        ClassDef {
            ty,
            super_class: None,
            interfaces: Vec::new(),
            flags,
            sfields: Vec::new(),
            ifields: Vec::new(),
            dmethods: Vec::new(),
            vmethods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    pub fn is_annotation(&self) -> bool {
        self.flags.contains(ClassFlags::ANNOTATION)
    }

    pub fn is_external(&self) -> bool {
        self.flags.contains(ClassFlags::EXTERNAL)
    }

    pub fn do_not_strip(&self) -> bool {
        self.flags.contains(ClassFlags::DO_NOT_STRIP)
    }
}
