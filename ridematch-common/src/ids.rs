//! Typed identifier wrappers
//!
//! Rides, chairs and users are all keyed by opaque text identifiers in
//! storage. Wrapping them keeps a chair id from being passed where a ride id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a typed wrapper around a text identifier.
macro_rules! text_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

text_id! {
    /// Identifier of a ride request
    pub struct RideId;
}

text_id! {
    /// Identifier of a dispatchable chair
    pub struct ChairId;
}

text_id! {
    /// Identifier of the user who requested a ride
    pub struct UserId;
}
