//! Whole-program iteration helpers.
//!
//! Each walker makes exactly one pass over the internal classes in scope
//! order. Callbacks run sequentially on the caller's thread; analyses are
//! free to mutate their own state inside them.

use crate::class::ClassDef;
use crate::insn::Insn;
use crate::member::{FieldRefId, MethodData, MethodRefId};
use crate::program::Program;

/// Visit every declared field (static then instance) of every internal
/// class.
pub fn walk_fields<F>(program: &Program, mut f: F)
where
    F: FnMut(&ClassDef, FieldRefId),
{
    for cls in program.scope() {
        for &fid in cls.sfields.iter().chain(cls.ifields.iter()) {
            f(cls, fid);
        }
    }
}

/// Visit every declared method (static-dispatch then virtual) of every
/// internal class.
pub fn walk_methods<F>(program: &Program, mut f: F)
where
    F: FnMut(MethodRefId, &MethodData),
{
    for cls in program.scope() {
        for &mid in cls.dmethods.iter().chain(cls.vmethods.iter()) {
            if let Some(data) = program.method_data(mid) {
                f(mid, data);
            }
        }
    }
}

/// Visit every instruction of every concrete method of every internal
/// class.
pub fn walk_opcodes<F>(program: &Program, mut f: F)
where
    F: FnMut(MethodRefId, &Insn),
{
    for cls in program.scope() {
        for &mid in cls.dmethods.iter().chain(cls.vmethods.iter()) {
            let Some(body) = program.method_data(mid).and_then(|d| d.body.as_ref()) else {
                continue;
            };
            for insn in &body.insns {
                f(mid, insn);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDef, ClassFlags};
    use crate::insn::Op;
    use crate::member::{FieldData, MethodData, Proto};
    use pretty_assertions::assert_eq;

    #[test]
    fn walkers_skip_external_classes() {
        let mut program = Program::new();
        let int = program.pool.object("int");
        let void = program.pool.object("void");

        let internal = program.pool.object("A");
        let mut cls = ClassDef::new(internal, ClassFlags::empty());
        let fid = program.field_ref(internal, "x", int);
        program.define_field(fid, FieldData::default());
        cls.ifields.push(fid);
        let mid = program.method_ref(internal, "run", Proto::new(void, []));
        program.define_method(mid, MethodData::default());
        program.attach_code(mid, vec![Op::Other, Op::Other, Op::Other]);
        cls.vmethods.push(mid);
        program.add_class(cls);

        let external = program.pool.object("B");
        let mut ext = ClassDef::new(external, ClassFlags::EXTERNAL);
        let ext_fid = program.field_ref(external, "y", int);
        program.define_field(ext_fid, FieldData::default());
        ext.ifields.push(ext_fid);
        program.add_class(ext);

        let mut fields = 0;
        walk_fields(&program, |_, _| fields += 1);
        assert_eq!(fields, 1);

        let mut methods = 0;
        walk_methods(&program, |_, _| methods += 1);
        assert_eq!(methods, 1);

        let mut insns = 0;
        walk_opcodes(&program, |_, _| insns += 1);
        assert_eq!(insns, 3);
    }
}
