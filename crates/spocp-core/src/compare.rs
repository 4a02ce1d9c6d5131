//! The `≤` ("is at least as specific as") partial-order comparator.
//!
//! This is the algorithmic core of the whole crate: a query `q` is allowed
//! by a rule `r` iff `leq(q, r)`. The rules below are evaluated strictly in
//! order — the first rule whose type-pattern guard matches `(s, t)` commits
//! to that rule's verdict, true or false, and no later rule is consulted.

use crate::element::{Element, RangeForm, StarForm};

/// `leq(s, t)`: every request satisfied by `s` is also satisfied by `t`.
pub fn leq(s: &Element, t: &Element) -> bool {
    // Rule 1: t is Wildcard.
    if matches!(t, Element::Star(StarForm::Wildcard)) {
        return true;
    }

    match (s, t) {
        // Rule 2: both Atom.
        (Element::Atom(sv), Element::Atom(tv)) => sv == tv,

        // Rule 3: s is Atom, t is a (non-wildcard) star-form.
        (Element::Atom(_), Element::Star(star)) => star.matches(s),

        // Rule 4: both Range.
        (Element::Star(StarForm::Range(sr)), Element::Star(StarForm::Range(tr))) => range_leq(sr, tr),

        // Rule 5: both Prefix.
        (Element::Star(StarForm::Prefix(sv)), Element::Star(StarForm::Prefix(tv))) => {
            sv.starts_with(tv.as_slice())
        }

        // Rule 6: both Suffix.
        (Element::Star(StarForm::Suffix(sv)), Element::Star(StarForm::Suffix(tv))) => {
            sv.ends_with(tv.as_slice())
        }

        // Rule 7: both List.
        (Element::List(sl), Element::List(tl)) => {
            if sl.tag != tl.tag {
                return false;
            }
            if tl.elements.len() > sl.elements.len() {
                return false;
            }
            tl.elements
                .iter()
                .zip(sl.elements.iter())
                .all(|(te, se)| leq(se, te))
        }

        // Rule 8: s is a Set — every element of s must satisfy t.
        (Element::Star(StarForm::Set(elements)), _) => elements.iter().all(|e| leq(e, t)),

        // Rule 9: t is a Set — s must satisfy at least one element of t.
        (_, Element::Star(StarForm::Set(elements))) => elements.iter().any(|e| leq(s, e)),

        // Rule 10: no rule applies.
        _ => false,
    }
}

/// Rule 4's range-vs-range containment: does `t` contain every value that
/// `s` could contain? Bound values are compared byte-wise regardless of
/// `kind` — this mirrors the literal rule text and does not additionally
/// reason about exclusivity/inclusivity tightening at equal bound values
/// (an explicit open question left undecided, see `DESIGN.md`).
fn range_leq(s: &RangeForm, t: &RangeForm) -> bool {
    if s.kind != t.kind {
        return false;
    }
    match (&t.lower, &s.lower) {
        (Some(_), None) => return false,
        (Some(tb), Some(sb)) => {
            if tb.value > sb.value {
                return false;
            }
        }
        (None, _) => {}
    }
    match (&t.upper, &s.upper) {
        (Some(_), None) => return false,
        (Some(tb), Some(sb)) => {
            if tb.value < sb.value {
                return false;
            }
        }
        (None, _) => {}
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::{Bound, Op, RangeKind};
    use crate::grammar::parse;

    fn e(s: &str) -> Element {
        parse(s.as_bytes()).unwrap()
    }

    #[test]
    fn wildcard_absorbs_everything() {
        assert!(leq(&e("5:apple"), &Element::wildcard()));
        assert!(leq(&e("(5:fruit5:apple)"), &Element::wildcard()));
    }

    #[test]
    fn reflexive_for_atoms_lists_and_stars() {
        let atom = e("5:apple");
        assert!(leq(&atom, &atom));
        let list = e("(5:fruit5:apple5:large3:red)");
        assert!(leq(&list, &list));
        let set = Element::Star(StarForm::Set(vec![Element::atom("a")]));
        assert!(leq(&set, &set));
    }

    #[test]
    fn atom_equality() {
        assert!(leq(&e("5:apple"), &e("5:apple")));
        assert!(!leq(&e("5:apple"), &e("6:orange")));
    }

    #[test]
    fn list_order_matters() {
        let s = e("(5:fruit5:apple5:large3:red)");
        let t = e("(5:fruit5:apple3:red5:large)");
        assert!(!leq(&s, &t));
        assert!(!leq(&t, &s));
    }

    #[test]
    fn list_requires_matching_tag_and_prefix_arity() {
        let s = e("(5:fruit5:apple5:large3:red)");
        let t = e("(5:fruit5:apple5:large)");
        assert!(leq(&s, &t), "s has an extra trailing position, still satisfies shorter t");
        assert!(!leq(&t, &s), "t is longer than s so s cannot satisfy it");
    }

    #[test]
    fn set_as_target_is_existential() {
        let rule = Element::list(
            "action",
            vec![Element::Star(StarForm::Set(vec![Element::atom("read"), Element::atom("write")]))],
        );
        let allow = Element::list("action", vec![Element::atom("read")]);
        let deny = Element::list("action", vec![Element::atom("delete")]);
        assert!(leq(&allow, &rule));
        assert!(!leq(&deny, &rule));
    }

    #[test]
    fn set_as_source_is_universal() {
        let query = Element::Star(StarForm::Set(vec![Element::atom("read"), Element::atom("write")]));
        let rule_allows_both = Element::Star(StarForm::Set(vec![
            Element::atom("read"),
            Element::atom("write"),
            Element::atom("execute"),
        ]));
        let rule_allows_one = Element::Star(StarForm::Set(vec![Element::atom("read")]));
        assert!(leq(&query, &rule_allows_both));
        assert!(!leq(&query, &rule_allows_one));
    }

    #[test]
    fn prefix_containment() {
        let rule = Element::Star(StarForm::Prefix(b"/etc/".to_vec()));
        let narrower = Element::Star(StarForm::Prefix(b"/etc/ssh/".to_vec()));
        assert!(leq(&narrower, &rule));
        assert!(!leq(&rule, &narrower));
    }

    #[test]
    fn range_containment_requires_same_kind() {
        let wide = RangeForm {
            kind: RangeKind::Time,
            lower: Some(Bound { op: Op::Ge, value: b"08:00:00".to_vec() }),
            upper: Some(Bound { op: Op::Le, value: b"17:00:00".to_vec() }),
        };
        let narrow = RangeForm {
            kind: RangeKind::Time,
            lower: Some(Bound { op: Op::Ge, value: b"09:00:00".to_vec() }),
            upper: Some(Bound { op: Op::Le, value: b"10:00:00".to_vec() }),
        };
        assert!(leq(&Element::Star(StarForm::Range(narrow.clone())), &Element::Star(StarForm::Range(wide.clone()))));
        assert!(!leq(&Element::Star(StarForm::Range(wide)), &Element::Star(StarForm::Range(narrow))));

        let alpha = RangeForm { kind: RangeKind::Alpha, lower: None, upper: None };
        let time = RangeForm { kind: RangeKind::Time, lower: None, upper: None };
        assert!(!leq(&Element::Star(StarForm::Range(alpha)), &Element::Star(StarForm::Range(time))));
    }

    #[test]
    fn transitivity_holds_for_a_chain_of_prefixes() {
        let a = Element::Star(StarForm::Prefix(b"/etc/ssh/sshd_config".to_vec()));
        let b = Element::Star(StarForm::Prefix(b"/etc/ssh/".to_vec()));
        let c = Element::Star(StarForm::Prefix(b"/etc/".to_vec()));
        assert!(leq(&a, &b));
        assert!(leq(&b, &c));
        assert!(leq(&a, &c));
    }

    #[test]
    fn scenario_e1_e2_http_action_rule() {
        let rule = e("(4:http(4:page10:index.html)(6:action3:GET)(4:user))");
        let allow = e("(4:http(4:page10:index.html)(6:action3:GET)(4:user4:olav))");
        let deny = e("(4:http(4:page10:index.html)(6:action4:POST)(4:user4:olav))");
        assert!(leq(&allow, &rule));
        assert!(!leq(&deny, &rule));
    }
}
