//! Intercepted request model.
//!
//! A [`FetchRequest`] is what the host runtime hands to the engine for every
//! intercepted network call. Besides method, URL and headers it carries the
//! request [`Destination`], the hint browsers attach to say what the response
//! will be used for (an image, a stylesheet, a top-level navigation, ...).

use std::fmt;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::{Deserialize, Serialize};

use crate::key::EntryKey;

/// What the requested resource will be used for.
///
/// Mirrors the `destination` attribute of a fetch request. Unknown values
/// parse to [`Destination::Other`], an empty string to [`Destination::Empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// No destination (plain `fetch()` calls, XHR).
    #[default]
    Empty,
    /// Top-level navigation.
    Document,
    /// `<img>`, CSS images, favicons.
    Image,
    /// Web fonts.
    Font,
    /// Stylesheets.
    Style,
    /// Scripts and modules.
    Script,
    /// Web app manifest.
    Manifest,
    /// Worker scripts.
    Worker,
    /// Anything else.
    Other,
}

impl Destination {
    /// Returns the wire name of this destination.
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Empty => "",
            Destination::Document => "document",
            Destination::Image => "image",
            Destination::Font => "font",
            Destination::Style => "style",
            Destination::Script => "script",
            Destination::Manifest => "manifest",
            Destination::Worker => "worker",
            Destination::Other => "other",
        }
    }

    /// Image, font, style and script destinations are static assets.
    pub fn is_static_asset(&self) -> bool {
        matches!(
            self,
            Destination::Image | Destination::Font | Destination::Style | Destination::Script
        )
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Destination {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => Destination::Empty,
            "document" => Destination::Document,
            "image" => Destination::Image,
            "font" => Destination::Font,
            "style" => Destination::Style,
            "script" => Destination::Script,
            "manifest" => Destination::Manifest,
            "worker" => Destination::Worker,
            _ => Destination::Other,
        })
    }
}

/// A request intercepted by the engine.
///
/// # Example
///
/// ```
/// use offbox_core::{Destination, FetchRequest};
///
/// let request = FetchRequest::get("https://fonts.gstatic.com/foo.woff2")
///     .unwrap()
///     .with_destination(Destination::Font);
///
/// assert_eq!(request.path(), "/foo.woff2");
/// assert!(request.destination().is_static_asset());
/// ```
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: Method,
    uri: Uri,
    destination: Destination,
    headers: HeaderMap,
}

impl FetchRequest {
    /// Creates a request with the given method and URI and no destination.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            destination: Destination::Empty,
            headers: HeaderMap::new(),
        }
    }

    /// Creates a `GET` request.
    ///
    /// # Errors
    ///
    /// Returns an error when `uri` is not a valid URI.
    pub fn get<T>(uri: T) -> Result<Self, http::Error>
    where
        T: TryInto<Uri>,
        T::Error: Into<http::Error>,
    {
        Ok(Self::new(Method::GET, uri.try_into().map_err(Into::into)?))
    }

    /// Creates a `GET` request for a top-level navigation.
    ///
    /// # Errors
    ///
    /// Returns an error when `uri` is not a valid URI.
    pub fn navigation<T>(uri: T) -> Result<Self, http::Error>
    where
        T: TryInto<Uri>,
        T::Error: Into<http::Error>,
    {
        Ok(Self::get(uri)?.with_destination(Destination::Document))
    }

    /// Sets the request destination.
    pub fn with_destination(self, destination: Destination) -> Self {
        Self {
            destination,
            ..self
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Request method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request destination.
    #[inline]
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Request headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Path component of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Full URL as a string, the form rules and cache keys are matched against.
    pub fn href(&self) -> String {
        self.uri.to_string()
    }

    /// `true` for `GET`, the only method whose responses are ever cached.
    pub fn is_safe_read(&self) -> bool {
        self.method == Method::GET
    }

    /// `true` for top-level document navigations.
    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }

    /// Cache key of this request.
    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.method.clone(), self.href())
    }
}
