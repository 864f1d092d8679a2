use pretty_assertions::assert_eq;

use karst_model::{MethodFlags, MethodRefId, Op, Proto, TypeId};

use crate::escape::EscapeReason;
use crate::test_util::Fixture;

/// Shape/Circle pair plus a host class with one concrete method to hang
/// code on.
fn shape_fixture() -> (Fixture, TypeId, TypeId, MethodRefId) {
    let mut fx = Fixture::new();
    let shape = fx.interface("Shape");
    let circle = fx.implementation("Circle", shape);
    let host = fx.class("Host");
    let void = fx.ty("void");
    let main = fx.direct_method(host, "main", void, &[], MethodFlags::STATIC);
    (fx, shape, circle, main)
}

#[test]
fn typed_fields_are_inventoried() {
    let (mut fx, shape, _, _) = shape_fixture();
    let host = fx.ty("Host");
    let fref = fx.instance_field(host, "shape", shape);

    let analysis = fx.run_unpruned();
    let candidate = analysis.candidate(shape).map(|c| (c.escape, c.field_defs.clone()));
    assert_eq!(candidate, Some((EscapeReason::empty(), vec![fref])));
}

#[test]
fn array_typed_fields_record_and_escape() {
    let (mut fx, shape, _, _) = shape_fixture();
    let host = fx.ty("Host");
    let shape_arr = fx.program.pool.array_of(shape);
    let fref = fx.instance_field(host, "shapes", shape_arr);

    let analysis = fx.run_unpruned();
    assert!(analysis
        .candidate(shape)
        .is_some_and(|c| c.escape.contains(EscapeReason::HAS_ARRAY_TYPE)));
    assert!(analysis
        .candidate(shape)
        .is_some_and(|c| c.field_defs == vec![fref]));
}

#[test]
fn signatures_mentioning_a_candidate_are_inventoried() {
    let (mut fx, shape, _, _) = shape_fixture();
    let host = fx.ty("Host");
    let void = fx.ty("void");
    let m = fx.virtual_method(host, "draw", void, &[shape]);

    let analysis = fx.run_unpruned();
    let candidate = analysis.candidate(shape);
    assert!(candidate.is_some_and(|c| c.method_defs.contains(&m)));
    assert!(candidate.is_some_and(|c| c.escape.is_empty()));
}

#[test]
fn native_signatures_escape_the_candidate() {
    let (mut fx, shape, _, _) = shape_fixture();
    let host = fx.ty("Host");
    let void = fx.ty("void");
    fx.direct_method(
        host,
        "nativeDraw",
        void,
        &[shape],
        MethodFlags::STATIC | MethodFlags::NATIVE,
    );

    let analysis = fx.run_unpruned();
    assert_eq!(
        analysis.candidate(shape).map(|c| c.escape),
        Some(EscapeReason::NATIVE_METHOD)
    );
}

#[test]
fn self_referential_signatures_escape_the_candidate() {
    let (mut fx, shape, _, _) = shape_fixture();
    fx.virtual_method(shape, "copy", shape, &[]);

    let analysis = fx.run_unpruned();
    assert_eq!(
        analysis.candidate(shape).map(|c| c.escape),
        Some(EscapeReason::SELF_REFERENCE)
    );
}

#[test]
fn const_class_escapes_the_candidate() {
    let (mut fx, shape, _, main) = shape_fixture();
    fx.code(main, vec![Op::ConstClass(shape)]);

    let analysis = fx.run_unpruned();
    assert_eq!(
        analysis.candidate(shape).map(|c| c.escape),
        Some(EscapeReason::CONST_CLASS)
    );
}

#[test]
fn casts_and_allocations_are_inventoried() {
    let (mut fx, shape, _, main) = shape_fixture();
    let shape_arr = fx.program.pool.array_of(shape);
    fx.code(
        main,
        vec![
            Op::CheckCast(shape),
            Op::InstanceOf(shape),
            Op::Other,
            Op::NewArray(shape_arr),
        ],
    );

    let analysis = fx.run_unpruned();
    // the array allocation both records a type ref and escapes
    assert!(analysis
        .candidate(shape)
        .is_some_and(|c| c.type_refs.len() == 3));
    assert!(analysis
        .candidate(shape)
        .is_some_and(|c| c.escape == EscapeReason::HAS_ARRAY_TYPE));
}

#[test]
fn field_access_records_under_the_resolved_declaration() {
    let (mut fx, shape, _, main) = shape_fixture();
    let base = fx.class("Base");
    let derived = fx.class("Derived");
    if let Some(cls) = fx.program.class_mut(derived) {
        cls.super_class = Some(base);
    }
    let canonical = fx.instance_field(base, "shape", shape);
    // access through the subclass
    let through_derived = fx.program.field_ref(derived, "shape", shape);
    fx.code(main, vec![Op::InstanceGet(through_derived)]);

    let analysis = fx.run_unpruned();
    let refs = analysis
        .candidate(shape)
        .map(|c| c.field_refs.keys().copied().collect::<Vec<_>>());
    assert_eq!(refs, Some(vec![canonical]));
}

#[test]
fn unresolved_field_access_falls_back_to_the_reference() {
    let (mut fx, shape, _, main) = shape_fixture();
    let host = fx.ty("Host");
    // referenced but never declared anywhere
    let dangling = fx.program.field_ref(host, "phantom", shape);
    fx.code(main, vec![Op::StaticGet(dangling)]);

    let analysis = fx.run_unpruned();
    let candidate = analysis.candidate(shape);
    assert!(candidate.is_some_and(|c| c.field_refs.contains_key(&dangling)));
    assert!(candidate.is_some_and(|c| c.escape.is_empty()));
}

#[test]
fn field_declared_on_a_candidate_interface_escapes_it() {
    let (mut fx, shape, _, main) = shape_fixture();
    let int = fx.ty("int");
    let on_interface = fx.program.field_ref(shape, "weird", int);
    fx.code(main, vec![Op::StaticGet(on_interface)]);

    let analysis = fx.run_unpruned();
    assert_eq!(
        analysis.candidate(shape).map(|c| c.escape),
        Some(EscapeReason::HAS_FIELD_REF)
    );
}

#[test]
fn interface_dispatch_on_declared_methods_is_inventoried() {
    let (mut fx, shape, _, main) = shape_fixture();
    let float = fx.ty("float");
    let area = fx.virtual_method(shape, "area", float, &[]);
    fx.code(main, vec![Op::InvokeInterface(area), Op::InvokeInterface(area)]);

    let analysis = fx.run_unpruned();
    let candidate = analysis.candidate(shape);
    assert!(candidate
        .is_some_and(|c| c.intf_method_refs.get(&area).is_some_and(|s| s.len() == 2)));
    assert!(candidate.is_some_and(|c| c.escape.is_empty()));
}

#[test]
fn interface_dispatch_on_undeclared_methods_escapes() {
    let (mut fx, shape, _, main) = shape_fixture();
    let void = fx.ty("void");
    // referenced against Shape but never declared on it
    let inherited = fx.program.method_ref(shape, "toString", Proto::new(void, []));
    fx.code(main, vec![Op::InvokeInterface(inherited)]);

    let analysis = fx.run_unpruned();
    assert_eq!(
        analysis.candidate(shape).map(|c| c.escape),
        Some(EscapeReason::UNKNOWN_MREF)
    );
}

#[test]
fn interface_dispatch_still_checks_the_signature() {
    let mut fx = Fixture::new();
    let shape = fx.interface("Shape");
    fx.implementation("Circle", shape);
    let sink = fx.interface("Sink");
    fx.implementation("SinkImpl", sink);
    let host = fx.class("Host");
    let void = fx.ty("void");
    let main = fx.direct_method(host, "main", void, &[], MethodFlags::STATIC);
    // a Sink-declared method taking a Shape parameter
    let accept = fx.virtual_method(sink, "accept", void, &[shape]);
    fx.code(main, vec![Op::InvokeInterface(accept)]);

    let analysis = fx.run_unpruned();
    assert!(analysis
        .candidate(shape)
        .is_some_and(|c| c.method_refs.contains_key(&accept)));
    assert!(analysis
        .candidate(sink)
        .is_some_and(|c| c.intf_method_refs.contains_key(&accept)));
}

#[test]
fn other_invocations_record_signature_matches() {
    let (mut fx, shape, _, main) = shape_fixture();
    let host = fx.ty("Host");
    let void = fx.ty("void");
    let helper = fx.direct_method(host, "helper", void, &[shape], MethodFlags::STATIC);
    fx.code(main, vec![Op::InvokeStatic(helper), Op::InvokeVirtual(helper)]);

    let analysis = fx.run_unpruned();
    let count = analysis
        .candidate(shape)
        .and_then(|c| c.method_refs.get(&helper))
        .map_or(0, |s| s.len());
    assert_eq!(count, 2);
}
