//! The binary rule-file container: a fixed magic header, a version byte,
//! a rule count, then that many length-prefixed canonical-form payloads.
//! Used for bulk storage/transfer where a text rules directory is
//! inconvenient; reading one replays rules in file order, preserving the
//! insertion-order guarantee the rest of the system depends on.

use std::io::{Read, Write};

use spocp_core::{parse, render, Element};

use crate::error::NetError;

const MAGIC: &[u8; 5] = b"SPOCP";
const VERSION: u8 = 1;

/// Serializes `elements` into the binary container format.
pub fn write_container<W: Write>(mut out: W, elements: &[Element]) -> Result<(), NetError> {
    out.write_all(MAGIC)?;
    out.write_all(&[VERSION])?;
    out.write_all(&(elements.len() as u32).to_le_bytes())?;
    for element in elements {
        let payload = render(element);
        out.write_all(&(payload.len() as u32).to_le_bytes())?;
        out.write_all(&payload)?;
    }
    Ok(())
}

/// Reads the binary container format, returning rules in file order.
pub fn read_container<R: Read>(mut input: R) -> Result<Vec<Element>, NetError> {
    let mut magic = [0u8; 5];
    input.read_exact(&mut magic).map_err(|_| NetError::Truncated)?;
    if &magic != MAGIC {
        return Err(NetError::BadMagic);
    }
    let mut version = [0u8; 1];
    input.read_exact(&mut version).map_err(|_| NetError::Truncated)?;
    if version[0] != VERSION {
        return Err(NetError::UnsupportedVersion(version[0]));
    }
    let mut count_bytes = [0u8; 4];
    input.read_exact(&mut count_bytes).map_err(|_| NetError::Truncated)?;
    let count = u32::from_le_bytes(count_bytes) as usize;

    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let mut len_bytes = [0u8; 4];
        input.read_exact(&mut len_bytes).map_err(|_| NetError::Truncated)?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        let mut payload = vec![0u8; len];
        input.read_exact(&mut payload).map_err(|_| NetError::Truncated)?;
        let element = parse(&payload).map_err(|source| NetError::RuleParse {
            path: "<binary container>".into(),
            line: 0,
            source,
        })?;
        elements.push(element);
    }
    Ok(elements)
}
