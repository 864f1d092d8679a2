//! Escape-reason taxonomy.
//!
//! Each reason is an independent bit so a candidate can accumulate every
//! disqualifying condition observed, combination is a single OR, and the
//! monotonicity property ("bits are never cleared") is a cheap equality
//! check in tests.

use bitflags::bitflags;

bitflags! {
    /// Why a single-implemented interface cannot be folded into its
    /// implementation. Zero means "still optimizable".
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct EscapeReason: u32 {
        /// Used as an array element type; element identity through
        /// arrays is not tracked.
        const HAS_ARRAY_TYPE = 1 << 0;
        /// Removed by the allow/deny-list configuration.
        const FILTERED = 1 << 1;
        /// Marked as must-not-be-removed; an external dependency keys
        /// off the type's identity.
        const DO_NOT_STRIP = 1 << 2;
        /// The implementation has an ancestor the analysis cannot see.
        const IMPL_PARENT_ESCAPED = 1 << 3;
        /// The interface declares static-dispatch methods (static
        /// initializer included).
        const CLINIT = 1 << 4;
        /// The interface declares static fields.
        const HAS_SFIELDS = 1 << 5;
        /// Interface in the primary load partition, implementation
        /// outside it.
        const NOT_IN_PRIMARY = 1 << 6;
        /// Mentioned in the signature of a native method.
        const NATIVE_METHOD = 1 << 7;
        /// A method mentioning the interface is declared on the
        /// interface itself.
        const SELF_REFERENCE = 1 << 8;
        /// Used as a class-literal operand; the literal can key a
        /// mechanism the analysis cannot see through.
        const CONST_CLASS = 1 << 9;
        /// A field reference declares the interface as its owner.
        const HAS_FIELD_REF = 1 << 10;
        /// An interface-dispatch target is not declared on the
        /// interface (inherited/default method the model misses).
        const UNKNOWN_MREF = 1 << 11;
        /// Used where runtime type identity is unresolved or ambiguous.
        const UNKNOWN_TYPE = 1 << 12;
    }
}
