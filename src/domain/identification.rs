//! Customer identification
//!
//! OICP models the identification as an object with exactly one member,
//! named after the authentication mode. Serde's externally tagged enum
//! representation matches that shape directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RFID card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RfidType {
    #[serde(rename = "mifareCls")]
    MifareClassic,
    #[serde(rename = "mifareDes")]
    MifareDesfire,
    #[serde(rename = "calypso")]
    Calypso,
    #[serde(rename = "nfc")]
    Nfc,
    #[serde(rename = "mifareFamily")]
    MifareFamily,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPin {
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Function")]
    pub function: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identification {
    #[serde(rename = "RFIDMifareFamilyIdentification")]
    RfidMifareFamily {
        #[serde(rename = "UID")]
        uid: String,
    },

    #[serde(rename = "RFIDIdentification")]
    Rfid {
        #[serde(rename = "UID")]
        uid: String,
        #[serde(rename = "RFID")]
        rfid: RfidType,
        #[serde(rename = "EvcoID", skip_serializing_if = "Option::is_none")]
        evco_id: Option<String>,
        #[serde(rename = "PrintedNumber", skip_serializing_if = "Option::is_none")]
        printed_number: Option<String>,
        #[serde(rename = "ExpiryDate", skip_serializing_if = "Option::is_none")]
        expiry_date: Option<DateTime<Utc>>,
    },

    #[serde(rename = "QRCodeIdentification")]
    QrCode {
        #[serde(rename = "EvcoID")]
        evco_id: String,
        #[serde(rename = "HashedPIN", skip_serializing_if = "Option::is_none")]
        hashed_pin: Option<HashedPin>,
        #[serde(rename = "PIN", skip_serializing_if = "Option::is_none")]
        pin: Option<String>,
    },

    #[serde(rename = "PlugAndChargeIdentification")]
    PlugAndCharge {
        #[serde(rename = "EvcoID")]
        evco_id: String,
    },

    #[serde(rename = "RemoteIdentification")]
    Remote {
        #[serde(rename = "EvcoID")]
        evco_id: String,
    },
}

impl Identification {
    pub fn remote(evco_id: impl Into<String>) -> Self {
        Self::Remote {
            evco_id: evco_id.into(),
        }
    }

    /// The contract id, when the identification carries one.
    pub fn evco_id(&self) -> Option<&str> {
        match self {
            Self::RfidMifareFamily { .. } => None,
            Self::Rfid { evco_id, .. } => evco_id.as_deref(),
            Self::QrCode { evco_id, .. }
            | Self::PlugAndCharge { evco_id }
            | Self::Remote { evco_id } => Some(evco_id),
        }
    }
}
