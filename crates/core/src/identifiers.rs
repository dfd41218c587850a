//! Identifiers for railways, station aliases and station groups.
//!
//! Backed by `Arc<str>`: the same railway id is cloned into every subline,
//! lookup key and feature that refers to it.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(Arc::from(s.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s))
            }
        }
    };
}

identifier!(
    /// A railway, e.g. `odpt.Railway:TokyoMetro.Ginza`.
    RailwayIdentifier
);
identifier!(
    /// One railway's view of a station, e.g. `odpt.Station:TokyoMetro.Ginza.Shibuya`.
    StationIdentifier
);
identifier!(
    /// A physical station joining the aliases of every railway serving it.
    StationGroupIdentifier
);
