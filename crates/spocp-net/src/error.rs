// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rule at {path}:{line} failed to parse: {source}")]
    RuleParse {
        path: std::path::PathBuf,
        line: usize,
        #[source]
        source: spocp_core::ParseError,
    },

    #[error("binary container has a bad magic header")]
    BadMagic,

    #[error("binary container version {0} is not supported")]
    UnsupportedVersion(u8),

    #[error("binary container is truncated")]
    Truncated,

    #[error("malformed AuthZen request: {0}")]
    MalformedAuthzen(String),

    #[error("unknown TCP operation `{0}`")]
    UnknownOperation(String),

    #[error("malformed wire frame: {0}")]
    MalformedFrame(String),
}
