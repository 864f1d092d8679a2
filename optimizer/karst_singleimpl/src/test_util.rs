//! Shared fixtures for analysis tests.
//!
//! `Fixture` wraps a [`Program`] under construction together with the
//! analysis inputs (primary partition, single-impl map, interface set)
//! so tests can describe small programs declaratively.

use rustc_hash::{FxHashMap, FxHashSet};

use karst_model::{
    ClassDef, ClassFlags, FieldData, FieldFlags, FieldRefId, MethodData, MethodFlags, MethodRefId,
    Op, Program, Proto, TypeId,
};

use crate::config::SingleImplConfig;
use crate::registry::{AnalysisError, SingleImplAnalysis};

pub(crate) struct Fixture {
    pub program: Program,
    pub primary: FxHashSet<TypeId>,
    pub single_impl: FxHashMap<TypeId, TypeId>,
    pub interfaces: FxHashSet<TypeId>,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            program: Program::new(),
            primary: FxHashSet::default(),
            single_impl: FxHashMap::default(),
            interfaces: FxHashSet::default(),
        }
    }

    /// Intern a type with no class definition (primitives, externals
    /// referenced only by name).
    pub fn ty(&mut self, name: &str) -> TypeId {
        self.program.pool.object(name)
    }

    pub fn class_with_flags(&mut self, name: &str, flags: ClassFlags) -> TypeId {
        let ty = self.program.pool.object(name);
        self.program.add_class(ClassDef::new(ty, flags));
        ty
    }

    pub fn class(&mut self, name: &str) -> TypeId {
        self.class_with_flags(name, ClassFlags::empty())
    }

    pub fn interface(&mut self, name: &str) -> TypeId {
        self.interface_extending(name, &[])
    }

    pub fn interface_extending(&mut self, name: &str, supers: &[TypeId]) -> TypeId {
        let ty = self.program.pool.object(name);
        let mut cls = ClassDef::new(ty, ClassFlags::INTERFACE);
        cls.interfaces.extend_from_slice(supers);
        self.program.add_class(cls);
        self.interfaces.insert(ty);
        ty
    }

    /// Declare `name` as the sole implementation of `intf`.
    pub fn implementation(&mut self, name: &str, intf: TypeId) -> TypeId {
        let ty = self.program.pool.object(name);
        let mut cls = ClassDef::new(ty, ClassFlags::empty());
        cls.interfaces.push(intf);
        self.program.add_class(cls);
        self.single_impl.insert(intf, ty);
        ty
    }

    pub fn virtual_method(
        &mut self,
        owner: TypeId,
        name: &str,
        ret: TypeId,
        args: &[TypeId],
    ) -> MethodRefId {
        self.method(owner, name, ret, args, MethodFlags::empty(), false)
    }

    pub fn direct_method(
        &mut self,
        owner: TypeId,
        name: &str,
        ret: TypeId,
        args: &[TypeId],
        flags: MethodFlags,
    ) -> MethodRefId {
        self.method(owner, name, ret, args, flags, true)
    }

    fn method(
        &mut self,
        owner: TypeId,
        name: &str,
        ret: TypeId,
        args: &[TypeId],
        flags: MethodFlags,
        direct: bool,
    ) -> MethodRefId {
        let proto = Proto::new(ret, args.iter().copied());
        let mref = self.program.method_ref(owner, name, proto);
        self.program.define_method(mref, MethodData { flags, body: None });
        if let Some(cls) = self.program.class_mut(owner) {
            if direct {
                cls.dmethods.push(mref);
            } else {
                cls.vmethods.push(mref);
            }
        }
        mref
    }

    pub fn static_field(&mut self, owner: TypeId, name: &str, ty: TypeId) -> FieldRefId {
        let fref = self.program.field_ref(owner, name, ty);
        self.program.define_field(
            fref,
            FieldData {
                flags: FieldFlags::STATIC,
            },
        );
        if let Some(cls) = self.program.class_mut(owner) {
            cls.sfields.push(fref);
        }
        fref
    }

    pub fn instance_field(&mut self, owner: TypeId, name: &str, ty: TypeId) -> FieldRefId {
        let fref = self.program.field_ref(owner, name, ty);
        self.program.define_field(fref, FieldData::default());
        if let Some(cls) = self.program.class_mut(owner) {
            cls.ifields.push(fref);
        }
        fref
    }

    pub fn code(&mut self, method: MethodRefId, ops: Vec<Op>) {
        self.program.attach_code(method, ops);
    }

    /// Full pipeline, escaped candidates pruned.
    pub fn run(&self) -> SingleImplAnalysis {
        self.run_config(&SingleImplConfig::default())
    }

    pub fn run_config(&self, config: &SingleImplConfig) -> SingleImplAnalysis {
        match self.try_run(config) {
            Ok(analysis) => analysis,
            Err(err) => panic!("analysis failed: {err}"),
        }
    }

    pub fn try_run(&self, config: &SingleImplConfig) -> Result<SingleImplAnalysis, AnalysisError> {
        crate::analyze(
            &self.program,
            &self.primary,
            &self.single_impl,
            &self.interfaces,
            config,
        )
    }

    /// Full pipeline minus the prune, so tests can inspect escape
    /// reasons.
    pub fn run_unpruned(&self) -> SingleImplAnalysis {
        self.run_unpruned_config(&SingleImplConfig::default())
    }

    pub fn run_unpruned_config(&self, config: &SingleImplConfig) -> SingleImplAnalysis {
        let mut analysis = SingleImplAnalysis::default();
        match analysis.register(&self.program, &self.single_impl) {
            Ok(()) => {}
            Err(err) => panic!("registration failed: {err}"),
        }
        analysis.link_children(&self.program, &self.interfaces);
        crate::run_stages(&mut analysis, &self.program, &self.primary, config);
        analysis
    }
}
