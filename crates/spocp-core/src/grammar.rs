//! Canonical form parsing and rendering.
//!
//! Canonical form is Rivest-style length-prefixed notation: every atom is
//! `LEN ":" BYTES`, every list is `"(" atom element* ")"` with the first
//! atom acting as the list's tag. A list whose tag is the single byte `*`
//! is a star-form marker (`crate::element::StarForm`) rather than an
//! ordinary list — see `parse_star_form` below.

use crate::element::{AtomValue, Bound, Element, List, Op, RangeForm, RangeKind, StarForm};
use crate::error::ParseError;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        match self.peek() {
            Some(b'(') => self.parse_list(),
            Some(c) if c.is_ascii_digit() => self.parse_atom().map(Element::Atom),
            _ => Err(ParseError::UnexpectedInput { offset: self.pos }),
        }
    }

    fn parse_atom(&mut self) -> Result<AtomValue, ParseError> {
        let start = self.pos;
        let mut digits = 0usize;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits += 1;
                self.pos += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(ParseError::UnexpectedInput { offset: start });
        }
        let len_str = std::str::from_utf8(&self.input[start..start + digits]).unwrap();
        let len: usize = len_str
            .parse()
            .map_err(|_| ParseError::InvalidLength { offset: start })?;
        match self.peek() {
            Some(b':') => self.pos += 1,
            _ => return Err(ParseError::MissingColon { offset: self.pos }),
        }
        if self.pos + len > self.input.len() {
            return Err(ParseError::LengthExceedsInput {
                offset: start,
                declared: len,
                available: self.input.len() - self.pos,
            });
        }
        let bytes = self.input[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }

    fn parse_list(&mut self) -> Result<Element, ParseError> {
        let start = self.pos;
        self.pos += 1; // consume '('
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {}
            _ => return Err(ParseError::ListMissingTag { offset: start }),
        }
        let tag = self.parse_atom()?;
        if tag == b"*" {
            return self.parse_star_form(start);
        }
        let mut elements = Vec::new();
        loop {
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => elements.push(self.parse_element()?),
                None => return Err(ParseError::UnclosedList { offset: start }),
            }
        }
        Ok(Element::List(List { tag, elements }))
    }

    fn parse_star_form(&mut self, start: usize) -> Result<Element, ParseError> {
        match self.peek() {
            Some(b')') => {
                self.pos += 1;
                return Ok(Element::Star(StarForm::Wildcard));
            }
            Some(_) => {}
            None => return Err(ParseError::UnclosedList { offset: start }),
        }

        let kind_pos = self.pos;
        let kind_bytes = self.parse_atom()?;
        let kind_str = String::from_utf8_lossy(&kind_bytes).into_owned();

        match kind_str.as_str() {
            "set" => {
                let mut elements = Vec::new();
                loop {
                    match self.peek() {
                        Some(b')') => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => elements.push(self.parse_element()?),
                        None => return Err(ParseError::UnclosedList { offset: start }),
                    }
                }
                Ok(Element::Star(StarForm::Set(elements)))
            }
            "range" => {
                let domain_pos = self.pos;
                match self.peek() {
                    Some(c) if c.is_ascii_digit() => {}
                    _ => return Err(ParseError::WrongStarFormArity { offset: domain_pos }),
                }
                let domain_bytes = self.parse_atom()?;
                let domain_str = String::from_utf8_lossy(&domain_bytes).into_owned();
                let kind = RangeKind::from_str(&domain_str).ok_or_else(|| {
                    ParseError::UnknownStarFormKind {
                        kind: domain_str.clone(),
                        offset: domain_pos,
                    }
                })?;

                let mut lower = None;
                let mut upper = None;
                let mut count = 0usize;
                loop {
                    match self.peek() {
                        Some(b')') => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => {
                            if count >= 2 {
                                return Err(ParseError::TooManyRangeBounds { offset: start });
                            }
                            let op_pos = self.pos;
                            let op_bytes = self.parse_atom()?;
                            let op_str = String::from_utf8_lossy(&op_bytes).into_owned();
                            let op = Op::from_str(&op_str).ok_or_else(|| ParseError::InvalidRangeOp {
                                op: op_str.clone(),
                                offset: op_pos,
                            })?;
                            let value = self.parse_atom()?;
                            let bound = Bound { op, value };
                            if op.is_lower() {
                                lower = Some(bound);
                            } else {
                                upper = Some(bound);
                            }
                            count += 1;
                        }
                        None => return Err(ParseError::UnclosedList { offset: start }),
                    }
                }
                Ok(Element::Star(StarForm::Range(RangeForm { kind, lower, upper })))
            }
            "prefix" | "suffix" => {
                let value_pos = self.pos;
                let value = match self.peek() {
                    Some(c) if c.is_ascii_digit() => self.parse_atom()?,
                    _ => return Err(ParseError::WrongStarFormArity { offset: value_pos }),
                };
                match self.peek() {
                    Some(b')') => self.pos += 1,
                    _ => return Err(ParseError::WrongStarFormArity { offset: value_pos }),
                }
                Ok(Element::Star(if kind_str == "prefix" {
                    StarForm::Prefix(value)
                } else {
                    StarForm::Suffix(value)
                }))
            }
            _ => Err(ParseError::UnknownStarFormKind {
                kind: kind_str,
                offset: kind_pos,
            }),
        }
    }
}

/// Parse exactly one element from canonical form. Trailing bytes after the
/// outermost element are an error, not silently ignored.
pub fn parse(input: &[u8]) -> Result<Element, ParseError> {
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let mut parser = Parser { input, pos: 0 };
    let element = parser.parse_element()?;
    if parser.pos != input.len() {
        return Err(ParseError::TrailingData {
            offset: parser.pos,
            extra: input.len() - parser.pos,
        });
    }
    Ok(element)
}

fn render_atom(out: &mut Vec<u8>, v: &[u8]) {
    out.extend_from_slice(v.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(v);
}

/// Render an element back to canonical form. Guaranteed to round-trip:
/// `parse(&render(e)) == Ok(e)` for every `e`.
pub fn render(e: &Element) -> Vec<u8> {
    let mut out = Vec::new();
    render_into(&mut out, e);
    out
}

fn render_into(out: &mut Vec<u8>, e: &Element) {
    match e {
        Element::Atom(v) => render_atom(out, v),
        Element::List(list) => {
            out.push(b'(');
            render_atom(out, &list.tag);
            for child in &list.elements {
                render_into(out, child);
            }
            out.push(b')');
        }
        Element::Star(star) => render_star(out, star),
    }
}

fn render_star(out: &mut Vec<u8>, star: &StarForm) {
    out.push(b'(');
    render_atom(out, b"*");
    match star {
        StarForm::Wildcard => {}
        StarForm::Set(elements) => {
            render_atom(out, b"set");
            for e in elements {
                render_into(out, e);
            }
        }
        StarForm::Range(range) => {
            render_atom(out, b"range");
            render_atom(out, range.kind.as_str().as_bytes());
            if let Some(bound) = &range.lower {
                render_atom(out, bound.op.as_str().as_bytes());
                render_atom(out, &bound.value);
            }
            if let Some(bound) = &range.upper {
                render_atom(out, bound.op.as_str().as_bytes());
                render_atom(out, &bound.value);
            }
        }
        StarForm::Prefix(v) => {
            render_atom(out, b"prefix");
            render_atom(out, v);
        }
        StarForm::Suffix(v) => {
            render_atom(out, b"suffix");
            render_atom(out, v);
        }
    }
    out.push(b')');
}

fn text(v: &[u8]) -> String {
    if v.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
        String::from_utf8_lossy(v).into_owned()
    } else {
        let mut s = String::from("0x");
        for b in v {
            s.push_str(&format!("{b:02x}"));
        }
        s
    }
}

/// A human-readable rendering. Not guaranteed to parse back.
pub fn advanced_form(e: &Element) -> String {
    match e {
        Element::Atom(v) => text(v),
        Element::List(list) => {
            let mut parts = vec![text(&list.tag)];
            parts.extend(list.elements.iter().map(advanced_form));
            format!("({})", parts.join(" "))
        }
        Element::Star(star) => advanced_star(star),
    }
}

fn advanced_star(star: &StarForm) -> String {
    match star {
        StarForm::Wildcard => "(*)".to_string(),
        StarForm::Set(elements) => {
            let mut parts = vec!["*".to_string(), "set".to_string()];
            parts.extend(elements.iter().map(advanced_form));
            format!("({})", parts.join(" "))
        }
        StarForm::Range(range) => {
            let mut parts = vec!["*".to_string(), "range".to_string(), range.kind.as_str().to_string()];
            if let Some(b) = &range.lower {
                parts.push(b.op.as_str().to_string());
                parts.push(text(&b.value));
            }
            if let Some(b) = &range.upper {
                parts.push(b.op.as_str().to_string());
                parts.push(text(&b.value));
            }
            format!("({})", parts.join(" "))
        }
        StarForm::Prefix(v) => format!("(* prefix {})", text(v)),
        StarForm::Suffix(v) => format!("(* suffix {})", text(v)),
    }
}
