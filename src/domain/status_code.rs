//! OICP status codes
//!
//! Every OICP response carries a `StatusCode` object. Protocol failures are
//! signalled here and not via the HTTP status, so callers always receive 200
//! and must inspect `StatusCode.Code`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// OICP result codes, serialized as three-digit strings (`"000"`, `"022"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCodes {
    Success,
    HubjectSystemError,
    HubjectDatabaseError,
    DataTransactionError,
    UnauthorizedAccess,
    InconsistentEvseId,
    InconsistentEvcoId,
    SystemError,
    DataError,
    CardNotReadable,
    UnknownEvcoId,
    PartnerDidNotRespond,
    PartnerNotFound,
    PartnerEvseIdUnknown,
    SessionIsInvalid,
    CommunicationToEvseFailed,
    NoEvConnectedToEvse,
    EvseAlreadyReserved,
    EvseAlreadyInUseOrWrongToken,
    UnknownEvseId,
    EvseIdNotHubjectCompatible,
    EvseOutOfService,
}

impl StatusCodes {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "000",
            Self::HubjectSystemError => "001",
            Self::HubjectDatabaseError => "002",
            Self::DataTransactionError => "009",
            Self::UnauthorizedAccess => "017",
            Self::InconsistentEvseId => "018",
            Self::InconsistentEvcoId => "019",
            Self::SystemError => "021",
            Self::DataError => "022",
            Self::CardNotReadable => "101",
            Self::UnknownEvcoId => "102",
            Self::PartnerDidNotRespond => "300",
            Self::PartnerNotFound => "310",
            Self::PartnerEvseIdUnknown => "320",
            Self::SessionIsInvalid => "400",
            Self::CommunicationToEvseFailed => "501",
            Self::NoEvConnectedToEvse => "510",
            Self::EvseAlreadyReserved => "601",
            Self::EvseAlreadyInUseOrWrongToken => "602",
            Self::UnknownEvseId => "603",
            Self::EvseIdNotHubjectCompatible => "604",
            Self::EvseOutOfService => "700",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let status = match code {
            "000" => Self::Success,
            "001" => Self::HubjectSystemError,
            "002" => Self::HubjectDatabaseError,
            "009" => Self::DataTransactionError,
            "017" => Self::UnauthorizedAccess,
            "018" => Self::InconsistentEvseId,
            "019" => Self::InconsistentEvcoId,
            "021" => Self::SystemError,
            "022" => Self::DataError,
            "101" => Self::CardNotReadable,
            "102" => Self::UnknownEvcoId,
            "300" => Self::PartnerDidNotRespond,
            "310" => Self::PartnerNotFound,
            "320" => Self::PartnerEvseIdUnknown,
            "400" => Self::SessionIsInvalid,
            "501" => Self::CommunicationToEvseFailed,
            "510" => Self::NoEvConnectedToEvse,
            "601" => Self::EvseAlreadyReserved,
            "602" => Self::EvseAlreadyInUseOrWrongToken,
            "603" => Self::UnknownEvseId,
            "604" => Self::EvseIdNotHubjectCompatible,
            "700" => Self::EvseOutOfService,
            _ => return None,
        };
        Some(status)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for StatusCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.code(), self)
    }
}

impl Serialize for StatusCodes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for StatusCodes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown OICP status code '{code}'")))
    }
}

/// `StatusCode` object embedded into every OICP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    #[serde(rename = "Code")]
    pub code: StatusCodes,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "AdditionalInfo", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl StatusCode {
    pub fn new(code: StatusCodes) -> Self {
        Self {
            code,
            description: None,
            additional_info: None,
        }
    }

    pub fn success() -> Self {
        Self::new(StatusCodes::Success)
    }

    pub fn system_error(description: impl Into<String>) -> Self {
        Self::new(StatusCodes::SystemError).with_description(description)
    }

    pub fn data_error(description: impl Into<String>) -> Self {
        Self::new(StatusCodes::DataError).with_description(description)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}
