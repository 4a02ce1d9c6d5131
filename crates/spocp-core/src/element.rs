//! The restricted S-expression data model.
//!
//! [`Element`] is the single recursive sum type every rule and query is
//! built from: a plain atom, a tagged list, or a star-form. Star-forms are
//! their own closed sub-sum ([`StarForm`]) rather than ordinary lists,
//! because the comparator in `compare.rs` dispatches on them directly
//! instead of re-deriving their meaning from list shape every time.

use std::fmt;

/// An octet string. Canonical form never requires atoms to be valid UTF-8.
pub type AtomValue = Vec<u8>;

/// A node in the restricted S-expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Atom(AtomValue),
    List(List),
    Star(StarForm),
}

/// A tagged, ordered sequence. The tag is an atom value, not a nested
/// element — `(5:fruit5:apple)` has tag `fruit` and one sub-element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub tag: AtomValue,
    pub elements: Vec<Element>,
}

impl List {
    pub fn new(tag: impl Into<AtomValue>, elements: Vec<Element>) -> Self {
        Self { tag: tag.into(), elements }
    }
}

/// The star-form sub-language: wildcard, set, range, prefix, suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarForm {
    Wildcard,
    Set(Vec<Element>),
    Range(RangeForm),
    Prefix(AtomValue),
    Suffix(AtomValue),
}

/// The ordered domain a range star-form is defined over.
///
/// `Numeric`, `Ipv4` and `Ipv6` compare lexicographically by byte value,
/// not by numeric/address magnitude — this mirrors the source system's
/// behavior (documented as an explicit design decision in `DESIGN.md`)
/// rather than silently reinterpreting existing rulesets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Alpha,
    Numeric,
    Date,
    Time,
    Ipv4,
    Ipv6,
}

impl RangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Time => "time",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "alpha" => Self::Alpha,
            "numeric" => Self::Numeric,
            "date" => Self::Date,
            "time" => Self::Time,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            _ => return None,
        })
    }
}

/// A bound operator. `Ge`/`Gt` are lower bounds, `Le`/`Lt` are upper bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "lt" => Self::Lt,
            "le" => Self::Le,
            "gt" => Self::Gt,
            "ge" => Self::Ge,
            _ => return None,
        })
    }

    pub fn is_lower(self) -> bool {
        matches!(self, Self::Gt | Self::Ge)
    }

    pub fn is_inclusive(self) -> bool {
        matches!(self, Self::Le | Self::Ge)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub op: Op,
    pub value: AtomValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeForm {
    pub kind: RangeKind,
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Element {
    pub fn atom(value: impl Into<AtomValue>) -> Self {
        Self::Atom(value.into())
    }

    pub fn list(tag: impl Into<AtomValue>, elements: Vec<Element>) -> Self {
        Self::List(List::new(tag, elements))
    }

    pub fn wildcard() -> Self {
        Self::Star(StarForm::Wildcard)
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&[u8]> {
        match self {
            Self::Atom(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::grammar::advanced_form(self))
    }
}
