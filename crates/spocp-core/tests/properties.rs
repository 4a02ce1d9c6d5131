//! Property-based tests for the invariants the comparator and grammar
//! are required to hold for every input, not just the worked examples in
//! the unit tests colocated with each module.

use proptest::prelude::*;

use spocp_core::element::{Bound, Op, RangeForm, RangeKind, StarForm};
use spocp_core::{leq, parse, render, Element};

fn atom_strategy() -> impl Strategy<Value = Element> {
    "[a-z]{1,8}".prop_map(Element::atom)
}

fn element_strategy() -> impl Strategy<Value = Element> {
    let leaf = atom_strategy();
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (("[a-z]{1,6}"), prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(tag, elements)| Element::list(tag, elements)),
            inner.clone().prop_map(|e| Element::Star(StarForm::Set(vec![e]))),
            Just(Element::wildcard()),
        ]
    });
    leaf
}

proptest! {
    #[test]
    fn round_trip(e in element_strategy()) {
        let bytes = render(&e);
        let parsed = parse(&bytes).expect("rendered canonical form must parse");
        prop_assert_eq!(parsed, e);
    }

    #[test]
    fn wildcard_absorption(e in element_strategy()) {
        prop_assert!(leq(&e, &Element::wildcard()));
    }

    #[test]
    fn reflexivity(e in element_strategy()) {
        prop_assert!(leq(&e, &e));
    }

    #[test]
    fn list_tag_prefix_containment(
        tag in "[a-z]{1,6}",
        common in prop::collection::vec(atom_strategy(), 0..3),
        extra in prop::collection::vec(atom_strategy(), 0..3),
    ) {
        let shorter = Element::list(tag.clone(), common.clone());
        let mut longer_elements = common;
        longer_elements.extend(extra);
        let longer = Element::list(tag, longer_elements);
        prop_assert!(leq(&longer, &shorter));
    }
}

#[test]
fn transitivity_sample() {
    // Exhaustive quantified transitivity over arbitrary Elements is
    // expensive to generate meaningfully (most random triples are simply
    // incomparable); this exercises the chains the comparator actually
    // has to get right: nested prefixes and nested sets.
    let a = Element::Star(StarForm::Prefix(b"/etc/ssh/sshd_config".to_vec()));
    let b = Element::Star(StarForm::Prefix(b"/etc/ssh/".to_vec()));
    let c = Element::Star(StarForm::Prefix(b"/etc/".to_vec()));
    assert!(leq(&a, &b) && leq(&b, &c) && leq(&a, &c));

    let lo = RangeForm {
        kind: RangeKind::Numeric,
        lower: Some(Bound { op: Op::Ge, value: b"50".to_vec() }),
        upper: Some(Bound { op: Op::Le, value: b"59".to_vec() }),
    };
    let mid = RangeForm {
        kind: RangeKind::Numeric,
        lower: Some(Bound { op: Op::Ge, value: b"10".to_vec() }),
        upper: Some(Bound { op: Op::Le, value: b"59".to_vec() }),
    };
    let hi = RangeForm {
        kind: RangeKind::Numeric,
        lower: None,
        upper: Some(Bound { op: Op::Le, value: b"59".to_vec() }),
    };
    let lo = Element::Star(StarForm::Range(lo));
    let mid = Element::Star(StarForm::Range(mid));
    let hi = Element::Star(StarForm::Range(hi));
    assert!(leq(&lo, &mid) && leq(&mid, &hi) && leq(&lo, &hi));
}

#[test]
fn order_sensitivity_e9() {
    let rule = parse(b"(5:fruit5:apple5:large3:red)").unwrap();
    let swapped = parse(b"(5:fruit5:apple3:red5:large)").unwrap();
    assert!(!leq(&rule, &swapped));
    assert!(!leq(&swapped, &rule));
}
