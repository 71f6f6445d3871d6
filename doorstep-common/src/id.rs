//! ULID-backed identifiers for domain records.
//!
//! Each entity gets its own newtype so ids cannot be mixed up across tables.
//! ULIDs are lexicographically sortable by creation time, which is what
//! gives eligibility resolution its stable ordering guarantee.

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(ulid::Ulid);

        impl $name {
            /// Generate a new unique identifier
            #[must_use]
            pub fn generate() -> Self {
                Self(ulid::Ulid::new())
            }

            /// Wrap an existing ULID
            #[must_use]
            pub const fn from_ulid(id: ulid::Ulid) -> Self {
                Self(id)
            }

            /// Get the underlying ULID
            #[must_use]
            pub const fn ulid(&self) -> ulid::Ulid {
                self.0
            }

            /// Get the timestamp (milliseconds since Unix epoch) encoded in
            /// this identifier
            #[must_use]
            pub const fn timestamp_ms(&self) -> u64 {
                self.0.timestamp_ms()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ulid::Ulid::from_string(s).map(Self)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                ulid::Ulid::from_string(&s)
                    .map(Self)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

identifier!(
    /// Identifier for a checked-in visitor
    VisitorId
);

identifier!(
    /// Identifier for a listed property
    PropertyId
);

identifier!(
    /// Identifier for an admin (agent) account
    AdminId
);

identifier!(
    /// Identifier for a visitor feedback record
    FeedbackId
);

identifier!(
    /// Identifier for a follow-up campaign
    CampaignId
);

identifier!(
    /// Identifier for a delivery-log entry
    DeliveryLogId
);

identifier!(
    /// Identifier for an unsubscribe entry
    UnsubscribeId
);
