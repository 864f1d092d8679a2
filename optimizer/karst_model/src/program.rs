//! The whole-program container.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::class::ClassDef;
use crate::insn::{Insn, InsnId, Op};
use crate::member::{
    FieldData, FieldRef, FieldRefId, MethodBody, MethodData, MethodRef, MethodRefId, Proto,
};
use crate::ty::{TypeId, TypePool};

/// Everything the analysis sees: the type pool, every class definition in
/// scope order, the field/method reference interners, and per-definition
/// data for declared members.
///
/// Built once by a loader (or a test fixture) and treated as read-only by
/// analyses.
#[derive(Default)]
pub struct Program {
    pub pool: TypePool,
    classes: FxHashMap<TypeId, ClassDef>,
    /// Class registration order; walkers traverse it so results are
    /// repeatable across runs on the same input.
    scope: Vec<TypeId>,
    field_refs: Vec<FieldRef>,
    field_index: FxHashMap<FieldRef, FieldRefId>,
    method_refs: Vec<MethodRef>,
    method_index: FxHashMap<MethodRef, MethodRefId>,
    fields: FxHashMap<FieldRefId, FieldData>,
    methods: FxHashMap<MethodRefId, MethodData>,
    next_insn: u32,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a field reference.
    pub fn field_ref(&mut self, owner: TypeId, name: &str, ty: TypeId) -> FieldRefId {
        let fref = FieldRef {
            owner,
            name: name.into(),
            ty,
        };
        if let Some(&id) = self.field_index.get(&fref) {
            return id;
        }
        let id = FieldRefId::new(self.field_refs.len());
        self.field_refs.push(fref.clone());
        self.field_index.insert(fref, id);
        id
    }

    /// Intern a method reference.
    pub fn method_ref(&mut self, owner: TypeId, name: &str, proto: Proto) -> MethodRefId {
        let mref = MethodRef {
            owner,
            name: name.into(),
            proto,
        };
        if let Some(&id) = self.method_index.get(&mref) {
            return id;
        }
        let id = MethodRefId::new(self.method_refs.len());
        self.method_refs.push(mref.clone());
        self.method_index.insert(mref, id);
        id
    }

    pub fn field(&self, id: FieldRefId) -> &FieldRef {
        &self.field_refs[id.index()]
    }

    pub fn method(&self, id: MethodRefId) -> &MethodRef {
        &self.method_refs[id.index()]
    }

    /// Definition data, `None` if the reference resolves to nothing
    /// declared in this program.
    pub fn field_data(&self, id: FieldRefId) -> Option<&FieldData> {
        self.fields.get(&id)
    }

    pub fn method_data(&self, id: MethodRefId) -> Option<&MethodData> {
        self.methods.get(&id)
    }

    pub fn add_class(&mut self, def: ClassDef) {
        self.scope.push(def.ty);
        self.classes.insert(def.ty, def);
    }

    pub fn class(&self, ty: TypeId) -> Option<&ClassDef> {
        self.classes.get(&ty)
    }

    pub fn class_mut(&mut self, ty: TypeId) -> Option<&mut ClassDef> {
        self.classes.get_mut(&ty)
    }

    /// All internal class definitions, in registration order.
    pub fn scope(&self) -> impl Iterator<Item = &ClassDef> {
        self.scope
            .iter()
            .filter_map(|ty| self.classes.get(ty))
            .filter(|cls| !cls.is_external())
    }

    /// Mark a field reference as declared, with the given flags.
    pub fn define_field(&mut self, id: FieldRefId, data: FieldData) {
        self.fields.insert(id, data);
    }

    /// Mark a method reference as declared, with the given flags.
    pub fn define_method(&mut self, id: MethodRefId, data: MethodData) {
        self.methods.insert(id, data);
    }

    /// Attach a body to a declared method, assigning fresh program-wide
    /// instruction ids.
    pub fn attach_code(&mut self, id: MethodRefId, ops: Vec<Op>) {
        let insns = ops
            .into_iter()
            .map(|op| {
                let insn = Insn {
                    id: InsnId::new(self.next_insn),
                    op,
                };
                self.next_insn += 1;
                insn
            })
            .collect();
        let data = self.methods.entry(id).or_default();
        data.body = Some(MethodBody { insns });
    }

    /// True iff `ty` and every transitive superclass and superinterface
    /// resolve to an internal class definition.
    ///
    /// A missing or external ancestor means the hierarchy could hide
    /// overrides or fields the analysis never sees.
    pub fn hierarchy_in_scope(&self, ty: TypeId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![ty];
        while let Some(cur) = stack.pop() {
            if !visited.insert(cur) {
                continue;
            }
            let Some(cls) = self.classes.get(&cur) else {
                return false;
            };
            if cls.is_external() {
                return false;
            }
            stack.extend(cls.super_class);
            stack.extend(cls.interfaces.iter().copied());
        }
        true
    }
}
