// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error as ThisError;

/// The reason a decode stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ThisError)]
#[non_exhaustive]
pub enum ParseErrorCode {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("invalid number literal")]
    InvalidNumberLiteral,
    #[error("invalid codepoint escape")]
    InvalidCodepointEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("trailing characters")]
    TrailingCharacters,
    #[error("depth limit exceeded")]
    DepthLimitExceeded,
    #[error("node limit exceeded")]
    NodeLimitExceeded,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
}

impl ParseErrorCode {
    /// True for the resource-limit codes, false for grammar violations.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            ParseErrorCode::DepthLimitExceeded | ParseErrorCode::NodeLimitExceeded
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// A syntax or resource-limit violation at the given byte offset.
    #[error("{0}, pos {1}")]
    Syntax(ParseErrorCode, usize),
    #[error("invalid decoder options: {0}")]
    InvalidOptions(String),
}

impl Error {
    pub fn code(&self) -> Option<ParseErrorCode> {
        match self {
            Error::Syntax(code, _) => Some(*code),
            Error::InvalidOptions(_) => None,
        }
    }

    /// Byte offset into the input at which the violation was detected.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Syntax(_, pos) => Some(*pos),
            Error::InvalidOptions(_) => None,
        }
    }
}
