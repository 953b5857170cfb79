//! Player and world identities, and the identity tokens they are stored under on disk.
//!
//! Tokens come in two shapes: the canonical hyphenated form
//! (`550e8400-e29b-41d4-a716-446655440000`) and the trimmed form the storage
//! directories are named with (`550e8400e29b41d4a716446655440000`).

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

lazy_static! {
    static ref TRIMMED_TOKEN: Regex = Regex::new(
        r"^([0-9a-fA-F]{8})([0-9a-fA-F]{4})([0-9a-fA-F]{4})([0-9a-fA-F]{4})([0-9a-fA-F]{12})$"
    )
    .unwrap();
    static ref HYPHENATED_TOKEN: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("`{0}` is not a hyphenated or trimmed identity token")]
    Malformed(String),
}

/// Parses an identity token in either the hyphenated or the trimmed form.
pub fn parse_identity_token(raw: &str) -> Result<Uuid, TokenError> {
    let normalized = if HYPHENATED_TOKEN.is_match(raw) {
        raw.to_owned()
    } else {
        TRIMMED_TOKEN
            .captures(raw)
            .map(|c| format!("{}-{}-{}-{}-{}", &c[1], &c[2], &c[3], &c[4], &c[5]))
            .ok_or_else(|| TokenError::Malformed(raw.to_owned()))?
    };
    Uuid::parse_str(&normalized).map_err(|_| TokenError::Malformed(raw.to_owned()))
}

macro_rules! identity_type {
    ($name:ident) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            pub fn uuid(self) -> Uuid {
                self.0
            }

            /// The separator-free form used for storage directory names
            pub fn trimmed(self) -> String {
                self.0.simple().to_string()
            }
        }

        impl FromStr for $name {
            type Err = TokenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_identity_token(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

identity_type!(PlayerId);
identity_type!(WorldId);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trimmed_and_hyphenated_are_the_same_identity() {
        let trimmed = parse_identity_token("550e8400e29b41d4a716446655440000").unwrap();
        let hyphenated = parse_identity_token("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(trimmed, hyphenated);
    }

    #[test]
    fn uppercase_tokens_parse() {
        let upper = parse_identity_token("550E8400E29B41D4A716446655440000").unwrap();
        let lower = parse_identity_token("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for raw in [
            "",
            "not-a-uuid",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a7164466554400000",
            "550e8400e29b41d4a71644665544000g",
            "550e8400e29b-41d4-a716-446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000",
            " 550e8400e29b41d4a716446655440000",
        ] {
            assert!(parse_identity_token(raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn trimmed_form_round_trips_through_display() {
        let player: PlayerId = "550e8400e29b41d4a716446655440000".parse().unwrap();
        assert_eq!(player.trimmed(), "550e8400e29b41d4a716446655440000");
        assert_eq!(player.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        let world: WorldId = player.to_string().parse().unwrap();
        assert_eq!(world.uuid(), player.uuid());
    }
}
