//! HTTP method selection for a request.

use std::fmt;

/// HTTP verb applied to a request.
///
/// The mapping to the wire-level verb string is total; there is no
/// unrecognized value to fall back from. `Default` is `Get`, the verb a
/// request uses when the caller expresses no preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    /// The exact uppercase verb string sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
