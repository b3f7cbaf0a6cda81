//! Typed ID wrappers providing compile-time safety for entity identifiers.
//!
//! YouTube identifiers are opaque strings assigned by the platform, so each
//! ID type is a newtype over `String`, preventing accidental misuse (e.g.,
//! passing a `ChannelId` where a `VideoId` is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a newtype ID wrapper over `String`.
///
/// The macro produces a struct with:
/// - `new()` taking anything `Into<String>`
/// - `as_str()` for borrowing the inner value
/// - `Display` delegating to the inner string
/// - `From<String>` and `From<&str>` conversions
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                /// Wrap an externally assigned identifier.
                #[must_use]
                pub fn new(id: impl Into<String>) -> Self {
                    Self(id.into())
                }

                /// Borrow the inner identifier.
                #[must_use]
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    Self(s)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }

            impl From<$name> for String {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Identifier of a video on the external platform.
    VideoId,
    /// Identifier of a channel on the external platform.
    ChannelId,
}
