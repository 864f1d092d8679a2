//! Field resolution against inheritance rules.
//!
//! Resolution rewrites a reference to the canonical reference of the
//! declaration it binds to at runtime. Instance lookup walks the
//! superclass chain; static lookup additionally searches the class's
//! interfaces before the superclass, mirroring JVM field resolution
//! order. Failure is `None`: callers that need an identity regardless
//! fall back to the unresolved reference itself.

use crate::member::FieldRefId;
use crate::program::Program;
use crate::ty::TypeId;

/// Which member space a field access names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSearch {
    Instance,
    Static,
}

/// Resolve a field reference to the canonical reference of its
/// declaration, or `None` if no declaration is found in scope.
pub fn resolve_field(program: &Program, fref: FieldRefId, search: FieldSearch) -> Option<FieldRefId> {
    let target = program.field(fref);
    resolve_in_class(program, target.owner, &target.name, target.ty, search)
}

fn resolve_in_class(
    program: &Program,
    cls_ty: TypeId,
    name: &str,
    ty: TypeId,
    search: FieldSearch,
) -> Option<FieldRefId> {
    let cls = program.class(cls_ty)?;
    let declared = match search {
        FieldSearch::Instance => &cls.ifields,
        FieldSearch::Static => &cls.sfields,
    };
    for &fid in declared {
        let decl = program.field(fid);
        if &*decl.name == name && decl.ty == ty {
            return Some(fid);
        }
    }
    if search == FieldSearch::Static {
        for &iface in &cls.interfaces {
            if let Some(fid) = resolve_in_class(program, iface, name, ty, search) {
                return Some(fid);
            }
        }
    }
    let sup = cls.super_class?;
    resolve_in_class(program, sup, name, ty, search)
}
