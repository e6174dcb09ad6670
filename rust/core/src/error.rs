// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for strict STEP parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by strict record parsing.
///
/// Georeference extraction never returns these: a missing or malformed fact
/// is reported as `None` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Unexpected end of input")]
    UnexpectedEof,
}

impl Error {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
