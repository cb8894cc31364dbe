//! Error types used outside of the pure codec and ledger code.

use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a failure that a command surfaces to the user.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// The remote API could not be reached or returned an error status.
    Request,
    /// A response body or a command argument could not be decoded.
    Decode,
    /// A report could not be rendered to the requested format.
    Render,
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorType::Config => "configuration error",
            ErrorType::Request => "request error",
            ErrorType::Decode => "decode error",
            ErrorType::Render => "render error",
        };
        f.write_str(s)
    }
}

/// Tags an internal result with an `ErrorType` before it leaves a public command.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: Error = e.into();
            e.context(error_type)
        })
    }
}
