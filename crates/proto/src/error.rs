use std::fmt::{self, Display};

/// The kind of transport failure that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service could not be reached.
    Connect,
    /// The request did not complete in time.
    Timeout,
    /// The reply could not be decoded.
    Decode,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connect => write!(f, "Connection failed"),
            ErrorKind::Timeout => write!(f, "Request timed out"),
            ErrorKind::Decode => write!(f, "Malformed reply"),
            ErrorKind::Other => write!(f, "Request failed"),
        }
    }
}
