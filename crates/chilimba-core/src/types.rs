//! Identifier newtypes shared by the local and remote stores.
//!
//! Identifiers are store-minted string keys. A freshly built entity that has
//! not been persisted yet carries an empty id; the persistence adapter mints a
//! key and copies it back before the entity is stored.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if no key has been assigned yet.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Key of a savings group.
    GroupId
);
id_type!(
    /// Key of a member within a group.
    MemberId
);
id_type!(
    /// Key of a transaction within a member.
    TransactionId
);
id_type!(
    /// Key of an authenticated user.
    UserId
);
