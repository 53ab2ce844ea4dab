use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

/// Public identifier of a marketplace user, as issued by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PublicId(Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AuctionId(Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemId(Uuid);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    InvalidUuid { kind: &'static str, value: String },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUuid { kind, .. } => write!(f, "not a valid {kind} id"),
        }
    }
}

impl std::error::Error for IdError {}

macro_rules! id_type {
    ($name:ident, $kind:expr) => {
        impl $name {
            pub const KIND: &'static str = $kind;

            pub fn parse(value: &str) -> Result<Self, IdError> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| IdError::InvalidUuid {
                        kind: Self::KIND,
                        value: value.to_string(),
                    })
            }

            /// Canonical lowercase hyphenated form, used for storage and URLs.
            pub fn to_key(&self) -> String {
                self.0.hyphenated().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Self::parse(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

id_type!(ReviewId, "review");
id_type!(PublicId, "public");
id_type!(AuctionId, "auction");
id_type!(ItemId, "item");

impl ReviewId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_uuid() {
        let id = ReviewId::parse("e8f48256-2460-418f-81b7-86dad2aa6e41").unwrap();
        assert_eq!(id.to_key(), "e8f48256-2460-418f-81b7-86dad2aa6e41");
    }

    #[test]
    fn normalises_case_for_storage() {
        let id = PublicId::parse("F38BA39A-3682-4803-A498-659F0BF05304").unwrap();
        assert_eq!(id.to_key(), "f38ba39a-3682-4803-a498-659f0bf05304");
    }

    #[test]
    fn rejects_garbage_with_kind_in_message() {
        let err = PublicId::parse("blahblah").unwrap_err();
        assert_eq!(err.to_string(), "not a valid public id");
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let err = serde_json::from_str::<AuctionId>("\"f38ba39a\"").unwrap_err();
        assert!(err.to_string().contains("not a valid auction id"));
    }
}
