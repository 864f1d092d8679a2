//! Interned type identities.
//!
//! Every class, interface, and array type in the analyzed program is
//! interned once in a [`TypePool`] and referred to by [`TypeId`] everywhere
//! else. Interning makes type equality and hashing O(1), which the analysis
//! relies on for its registries and inventories.

use rustc_hash::FxHashMap;

/// Interned identity of a type known to the program.
///
/// Two `TypeId`s are equal iff they name the same type. Ids are only
/// meaningful relative to the [`TypePool`] that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        TypeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

enum TypeData {
    /// A class or interface type, keyed by its dotted binary name
    /// (`com.example.Shape`).
    Object(Box<str>),
    /// An array type, keyed by its element type.
    Array(TypeId),
}

/// Interner for all types in a program.
#[derive(Default)]
pub struct TypePool {
    data: Vec<TypeData>,
    objects: FxHashMap<Box<str>, TypeId>,
    arrays: FxHashMap<TypeId, TypeId>,
}

impl TypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a class or interface type by dotted name.
    pub fn object(&mut self, name: &str) -> TypeId {
        if let Some(&ty) = self.objects.get(name) {
            return ty;
        }
        let ty = TypeId::new(self.data.len());
        self.data.push(TypeData::Object(name.into()));
        self.objects.insert(name.into(), ty);
        ty
    }

    /// Intern the array type with the given element type.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&ty) = self.arrays.get(&element) {
            return ty;
        }
        let ty = TypeId::new(self.data.len());
        self.data.push(TypeData::Array(element));
        self.arrays.insert(element, ty);
        ty
    }

    pub fn is_array(&self, ty: TypeId) -> bool {
        matches!(self.data[ty.index()], TypeData::Array(_))
    }

    /// Element type of an array, `None` for non-arrays.
    pub fn element(&self, ty: TypeId) -> Option<TypeId> {
        match self.data[ty.index()] {
            TypeData::Array(elem) => Some(elem),
            TypeData::Object(_) => None,
        }
    }

    /// Innermost element type: unwraps nested arrays, identity for
    /// non-arrays.
    pub fn leaf_element(&self, ty: TypeId) -> TypeId {
        let mut cur = ty;
        while let Some(elem) = self.element(cur) {
            cur = elem;
        }
        cur
    }

    /// Dotted name of a class or interface type, `None` for arrays.
    pub fn object_name(&self, ty: TypeId) -> Option<&str> {
        match &self.data[ty.index()] {
            TypeData::Object(name) => Some(name),
            TypeData::Array(_) => None,
        }
    }

    /// Human-readable rendering, arrays as `Elem[]`.
    pub fn display_name(&self, ty: TypeId) -> String {
        match &self.data[ty.index()] {
            TypeData::Object(name) => name.to_string(),
            TypeData::Array(elem) => format!("{}[]", self.display_name(*elem)),
        }
    }
}
