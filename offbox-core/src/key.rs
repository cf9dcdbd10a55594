//! Cache entry keys.
//!
//! An entry is identified by the request method and the full request URL.
//! Only `GET` requests are ever written, but the method stays part of the key
//! so a `HEAD` lookup never aliases a `GET` entry.

use std::fmt;

use http::Method;
use smol_str::SmolStr;

/// Key of a cached entry: method + full URL.
///
/// ```
/// use offbox_core::EntryKey;
///
/// let key = EntryKey::get("https://app.example/index.html");
/// assert_eq!(key.url(), "https://app.example/index.html");
/// assert_eq!(key.to_string(), "GET https://app.example/index.html");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    method: Method,
    url: SmolStr,
}

impl EntryKey {
    /// Creates a key.
    pub fn new(method: Method, url: impl Into<SmolStr>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Creates a `GET` key.
    pub fn get(url: impl Into<SmolStr>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Key method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Key URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Approximate heap footprint of this key.
    pub fn memory_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.url.len()
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
