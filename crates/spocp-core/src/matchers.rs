//! Per-star-form matching against a single candidate atom.
//!
//! These are used by the comparator (`compare.rs`, rule 3) whenever an
//! `Atom` query is weighed against a star-form rule. They are not used for
//! star-form-vs-star-form comparison — that is handled by dedicated rules
//! in the comparator, since containment between two ranges or two sets
//! means something different than a single atom matching one.

use chrono::DateTime;

use crate::element::{Element, RangeForm, RangeKind, StarForm};

impl StarForm {
    /// Whether `candidate` satisfies this star-form. Only meaningful when
    /// `candidate` is an `Atom` for `Prefix`/`Suffix`/`Range`; `Wildcard`
    /// accepts anything, `Set` accepts any structurally-equal element
    /// (not just atoms).
    pub fn matches(&self, candidate: &Element) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Set(elements) => elements.iter().any(|e| e == candidate),
            Self::Prefix(prefix) => candidate
                .as_atom()
                .is_some_and(|a| a.starts_with(prefix.as_slice())),
            Self::Suffix(suffix) => candidate
                .as_atom()
                .is_some_and(|a| a.ends_with(suffix.as_slice())),
            Self::Range(range) => candidate.as_atom().is_some_and(|a| range.matches(a)),
        }
    }
}

impl RangeForm {
    /// Whether the atom `candidate` falls within this range's bounds.
    /// A candidate (or bound) that fails to parse under the range's domain
    /// is a non-match, never an error — see `DESIGN.md` for why `date` is
    /// the only kind that actually parses rather than comparing raw bytes.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        match self.kind {
            RangeKind::Date => self.matches_date(candidate),
            RangeKind::Alpha | RangeKind::Numeric | RangeKind::Time | RangeKind::Ipv4 | RangeKind::Ipv6 => {
                self.matches_lexicographic(candidate)
            }
        }
    }

    fn matches_lexicographic(&self, candidate: &[u8]) -> bool {
        if let Some(bound) = &self.lower {
            let ord = candidate.cmp(bound.value.as_slice());
            let ok = if bound.op.is_inclusive() {
                ord.is_ge()
            } else {
                ord.is_gt()
            };
            if !ok {
                return false;
            }
        }
        if let Some(bound) = &self.upper {
            let ord = candidate.cmp(bound.value.as_slice());
            let ok = if bound.op.is_inclusive() {
                ord.is_le()
            } else {
                ord.is_lt()
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn matches_date(&self, candidate: &[u8]) -> bool {
        let Ok(candidate_str) = std::str::from_utf8(candidate) else {
            return false;
        };
        let Ok(candidate_dt) = DateTime::parse_from_rfc3339(candidate_str) else {
            return false;
        };
        if let Some(bound) = &self.lower {
            let Some(ord) = parse_bound_ord(&bound.value, candidate_dt) else {
                return false;
            };
            let ok = if bound.op.is_inclusive() { ord.is_le() } else { ord.is_lt() };
            if !ok {
                return false;
            }
        }
        if let Some(bound) = &self.upper {
            let Some(ord) = parse_bound_ord(&bound.value, candidate_dt) else {
                return false;
            };
            let ok = if bound.op.is_inclusive() { ord.is_ge() } else { ord.is_gt() };
            if !ok {
                return false;
            }
        }
        true
    }
}

/// Parses `bound_value` as RFC-3339 and returns `Some(bound.cmp(candidate))`,
/// or `None` if the bound itself fails to parse (treated as a non-match by
/// the caller, same as a candidate parse failure).
fn parse_bound_ord(
    bound_value: &[u8],
    candidate: DateTime<chrono::FixedOffset>,
) -> Option<std::cmp::Ordering> {
    let bound_str = std::str::from_utf8(bound_value).ok()?;
    let bound_dt = DateTime::parse_from_rfc3339(bound_str).ok()?;
    Some(bound_dt.cmp(&candidate))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::{Bound, Op};

    #[test]
    fn wildcard_matches_anything() {
        assert!(StarForm::Wildcard.matches(&Element::atom("anything")));
    }

    #[test]
    fn set_matches_member() {
        let set = StarForm::Set(vec![Element::atom("read"), Element::atom("write")]);
        assert!(set.matches(&Element::atom("read")));
        assert!(!set.matches(&Element::atom("delete")));
    }

    #[test]
    fn prefix_and_suffix() {
        let prefix = StarForm::Prefix(b"/etc/".to_vec());
        assert!(prefix.matches(&Element::atom("/etc/passwd")));
        assert!(!prefix.matches(&Element::atom("/var/log")));

        let suffix = StarForm::Suffix(b".log".to_vec());
        assert!(suffix.matches(&Element::atom("app.log")));
        assert!(!suffix.matches(&Element::atom("app.txt")));
    }

    #[test]
    fn time_range_is_lexicographic() {
        let range = RangeForm {
            kind: RangeKind::Time,
            lower: Some(Bound { op: Op::Ge, value: b"08:00:00".to_vec() }),
            upper: Some(Bound { op: Op::Le, value: b"17:00:00".to_vec() }),
        };
        assert!(range.matches(b"12:00:00"));
        assert!(!range.matches(b"20:00:00"));
        assert!(range.matches(b"08:00:00"));
    }

    #[test]
    fn numeric_range_is_lexicographic_not_magnitude() {
        // documented behavior: "9" > "10" lexicographically.
        let range = RangeForm {
            kind: RangeKind::Numeric,
            lower: Some(Bound { op: Op::Gt, value: b"5".to_vec() }),
            upper: None,
        };
        assert!(range.matches(b"9"));
        assert!(!range.matches(b"10"));
    }

    #[test]
    fn date_range_parses_rfc3339() {
        let range = RangeForm {
            kind: RangeKind::Date,
            lower: Some(Bound { op: Op::Ge, value: b"2020-01-01T00:00:00Z".to_vec() }),
            upper: Some(Bound { op: Op::Lt, value: b"2021-01-01T00:00:00Z".to_vec() }),
        };
        assert!(range.matches(b"2020-06-15T12:00:00Z"));
        assert!(!range.matches(b"2021-06-15T12:00:00Z"));
        assert!(!range.matches(b"not-a-date"));
    }
}
