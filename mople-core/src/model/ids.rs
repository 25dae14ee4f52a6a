//! Typed identifiers.
//!
//! The server uses numeric ids for every resource; wrapping them keeps a
//! `PlanId` from being passed where a `MeetingId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }
    };
}

id_type!(
    /// A meeting group.
    MeetingId
);
id_type!(
    /// A scheduled plan inside a meeting.
    PlanId
);
id_type!(
    /// A post-event review. Reviews are created from finished plans.
    ReviewId
);
id_type!(CommentId);
id_type!(NotificationId);
id_type!(UserId);

/// The thing a comment thread hangs off: a plan or its review share one
/// post id on the server.
pub type PostId = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&PlanId(42)).unwrap(), "42");
        let id: MeetingId = serde_json::from_str("7").unwrap();
        assert_eq!(id, MeetingId(7));
    }

    #[test]
    fn test_ids_parse_from_push_payloads() {
        assert_eq!(" 15 ".parse::<CommentId>().unwrap(), CommentId(15));
        assert!("abc".parse::<UserId>().is_err());
        assert_eq!(ReviewId::from(3).to_string(), "3");
    }
}
