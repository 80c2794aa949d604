//! OICP identifiers
//!
//! Provider, operator and EVSE identifiers are validated against the OICP
//! v2.3 patterns whenever they are parsed, whether from a URL segment or
//! from a JSON body.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::support::errors::ParseError;

static PROVIDER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}[*-]?[A-Za-z0-9]{3}$").expect("valid regex"));

static OPERATOR_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{2}\*?[A-Za-z0-9]{3}|\+?[0-9]{1,3}\*[0-9]{3})$").expect("valid regex")
});

static EVSE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([A-Za-z]{2}\*?[A-Za-z0-9]{3}\*?E[A-Za-z0-9*]{1,30})|(\+?[0-9]{1,3}\*[0-9]{3}\*[0-9*]{1,32}))$",
    )
    .expect("valid regex")
});

macro_rules! oicp_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $pattern:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Upper-cased form without the optional `*`/`-` separators,
            /// so `DE*GDF`, `DE-GDF` and `DEGDF` compare equal.
            pub fn normalized(&self) -> String {
                self.0
                    .chars()
                    .filter(|c| *c != '*' && *c != '-')
                    .map(|c| c.to_ascii_uppercase())
                    .collect()
            }

            pub fn same_as(&self, other: &Self) -> bool {
                self.normalized() == other.normalized()
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if $pattern.is_match(s) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(ParseError::InvalidIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                    })
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

oicp_identifier!(
    /// E-Mobility Provider identifier, e.g. `DE-GDF` or `DE*GDF`
    ProviderId,
    "provider identification",
    PROVIDER_ID
);

oicp_identifier!(
    /// Charge Point Operator identifier, e.g. `DE*ABC` or `+49*536`
    OperatorId,
    "operator identification",
    OPERATOR_ID
);

oicp_identifier!(
    /// EVSE identifier, e.g. `DE*ABC*E123456`
    EvseId,
    "EVSE identification",
    EVSE_ID
);

impl EvseId {
    /// Operator part of the EVSE id (`DE*ABC*E1` → `DE*ABC`, `+49*536*1` → `+49*536`).
    pub fn operator_id(&self) -> Option<OperatorId> {
        let s = self.0.as_str();
        if s.starts_with('+') || s.starts_with(|c: char| c.is_ascii_digit()) {
            let mut parts = s.splitn(3, '*');
            let country = parts.next()?;
            let operator = parts.next()?;
            return format!("{country}*{operator}").parse().ok();
        }
        let country = s.get(..2)?;
        let (separator, rest) = match s[2..].strip_prefix('*') {
            Some(rest) => ("*", rest),
            None => ("", &s[2..]),
        };
        let operator = rest.get(..3)?;
        format!("{country}{separator}{operator}").parse().ok()
    }
}

/// Charging session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Correlation id minted for every inbound request, echoed as `Process-ID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_accepts_oicp_formats() {
        for id in ["DE-GDF", "DE*GDF", "DEGDF", "de-8ps"] {
            assert!(id.parse::<ProviderId>().is_ok(), "{id} should parse");
        }
    }

    #[test]
    fn provider_id_rejects_garbage() {
        for id in ["not-a-valid-id", "", "DE-GD", "DE--GDF", "DE*GDF1"] {
            assert!(id.parse::<ProviderId>().is_err(), "{id} should be rejected");
        }
    }

    #[test]
    fn provider_ids_compare_normalized() {
        let a: ProviderId = "DE-GDF".parse().unwrap();
        let b: ProviderId = "de*gdf".parse().unwrap();
        assert!(a.same_as(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn operator_id_formats() {
        assert!("DE*ABC".parse::<OperatorId>().is_ok());
        assert!("+49*536".parse::<OperatorId>().is_ok());
        assert!("DE-ABC".parse::<OperatorId>().is_err());
    }

    #[test]
    fn evse_id_formats() {
        assert!("DE*ABC*E123456".parse::<EvseId>().is_ok());
        assert!("DEABCE123".parse::<EvseId>().is_ok());
        assert!("+49*536*7*1".parse::<EvseId>().is_ok());
        assert!("DE*ABC*123456".parse::<EvseId>().is_err());
    }

    #[test]
    fn evse_id_yields_operator() {
        let evse: EvseId = "DE*ABC*E123456".parse().unwrap();
        assert_eq!(evse.operator_id().unwrap().as_str(), "DE*ABC");
        let din: EvseId = "+49*536*7*1".parse().unwrap();
        assert_eq!(din.operator_id().unwrap().as_str(), "+49*536");
    }

    #[test]
    fn identifiers_deserialize_with_validation() {
        let ok: Result<ProviderId, _> = serde_json::from_str("\"DE-GDF\"");
        assert!(ok.is_ok());
        let err: Result<ProviderId, _> = serde_json::from_str("\"nope\"");
        assert!(err.is_err());
    }

    #[test]
    fn process_ids_are_unique() {
        assert_ne!(ProcessId::new(), ProcessId::new());
    }
}
