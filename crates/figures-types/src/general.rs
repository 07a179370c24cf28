use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Closed enumeration serialized by its variant name, parsed case-insensitively.
macro_rules! closed_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, [$($variant:ident => $text:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseError::unknown($kind, s))
            }
        }
    };
}

closed_enum!(Gender, "gender", [Male => "Male", Female => "Female"]);

closed_enum!(
    FieldOfActivity,
    "field of activity",
    [
        Poet => "Poet",
        Writer => "Writer",
        Astronomer => "Astronomer",
        Philosopher => "Philosopher",
        Mystic => "Mystic",
        Historian => "Historian",
    ]
);

closed_enum!(Status, "status", [Active => "Active", Inactive => "Inactive"]);

closed_enum!(
    /// Kind of attached resource, each kind has its own upload policy.
    ResourceKind,
    "resource kind",
    [Text => "text", Audio => "audio"]
);

impl Default for Status {
    fn default() -> Self {
        Status::Active
    }
}
