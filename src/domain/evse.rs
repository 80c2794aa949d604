//! EVSE data and status records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::identifiers::{EvseId, OperatorId};

/// Geo coordinates in one of the three OICP notations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoCoordinates {
    Google {
        #[serde(rename = "Coordinates")]
        coordinates: String,
    },
    DecimalDegree {
        #[serde(rename = "Latitude")]
        latitude: String,
        #[serde(rename = "Longitude")]
        longitude: String,
    },
    DegreeMinuteSeconds {
        #[serde(rename = "Latitude")]
        latitude: String,
        #[serde(rename = "Longitude")]
        longitude: String,
    },
}

impl GeoCoordinates {
    pub fn decimal(latitude: f64, longitude: f64) -> Self {
        Self::DecimalDegree {
            latitude: format!("{latitude:.6}"),
            longitude: format!("{longitude:.6}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoCoordinatesResponseFormat {
    Google,
    DecimalDegree,
    DegreeMinuteSeconds,
}

/// Center and radius (km) of a geographic search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchCenter {
    #[serde(rename = "GeoCoordinates")]
    pub geo_coordinates: GeoCoordinates,
    #[validate(range(min = 0.0))]
    #[serde(rename = "Radius")]
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvseStatus {
    Available,
    Reserved,
    Occupied,
    OutOfService,
    EvseNotFound,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationMode {
    #[serde(rename = "NFC RFID Classic")]
    NfcRfidClassic,
    #[serde(rename = "NFC RFID DESFire")]
    NfcRfidDesfire,
    #[serde(rename = "PnC")]
    PlugAndCharge,
    #[serde(rename = "REMOTE")]
    Remote,
    #[serde(rename = "Direct Payment")]
    DirectPayment,
    #[serde(rename = "No Authentication Required")]
    NoAuthenticationRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accessibility {
    #[serde(rename = "Free publicly accessible")]
    FreePubliclyAccessible,
    #[serde(rename = "Restricted access")]
    RestrictedAccess,
    #[serde(rename = "Paying publicly accessible")]
    PayingPubliclyAccessible,
    #[serde(rename = "Test Station")]
    TestStation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaType {
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "insert")]
    Insert,
    #[serde(rename = "delete")]
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoText {
    pub lang: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Street")]
    pub street: String,
    #[serde(rename = "PostalCode")]
    pub postal_code: String,
    #[serde(rename = "HouseNum", skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(rename = "Floor", skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(rename = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "TimeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingFacility {
    #[serde(rename = "PowerType")]
    pub power_type: String,
    #[serde(rename = "Voltage", skip_serializing_if = "Option::is_none")]
    pub voltage: Option<u32>,
    #[serde(rename = "Amperage", skip_serializing_if = "Option::is_none")]
    pub amperage: Option<u32>,
    #[serde(rename = "Power")]
    pub power: f64,
}

/// Static description of one EVSE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvseDataRecord {
    #[serde(rename = "deltaType", skip_serializing_if = "Option::is_none")]
    pub delta_type: Option<DeltaType>,
    #[serde(rename = "lastUpdate", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "OperatorID", skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<OperatorId>,
    #[serde(rename = "OperatorName", skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(rename = "ChargingStationID", skip_serializing_if = "Option::is_none")]
    pub charging_station_id: Option<String>,
    #[serde(rename = "ChargingStationNames", default)]
    pub charging_station_names: Vec<InfoText>,
    #[serde(rename = "HardwareManufacturer", skip_serializing_if = "Option::is_none")]
    pub hardware_manufacturer: Option<String>,
    #[serde(rename = "Address")]
    pub address: Address,
    #[serde(rename = "GeoCoordinates")]
    pub geo_coordinates: GeoCoordinates,
    #[serde(rename = "Plugs", default)]
    pub plugs: Vec<String>,
    #[serde(rename = "ChargingFacilities", default)]
    pub charging_facilities: Vec<ChargingFacility>,
    #[serde(rename = "RenewableEnergy")]
    pub renewable_energy: bool,
    #[serde(rename = "CalibrationLawDataAvailability")]
    pub calibration_law_data_availability: String,
    #[serde(rename = "AuthenticationModes", default)]
    pub authentication_modes: Vec<AuthenticationMode>,
    #[serde(rename = "PaymentOptions", default)]
    pub payment_options: Vec<String>,
    #[serde(rename = "ValueAddedServices", default)]
    pub value_added_services: Vec<String>,
    #[serde(rename = "Accessibility")]
    pub accessibility: Accessibility,
    #[serde(rename = "HotlinePhoneNumber")]
    pub hotline_phone_number: String,
    #[serde(rename = "IsOpen24Hours")]
    pub is_open_24_hours: bool,
    #[serde(rename = "IsHubjectCompatible")]
    pub is_hubject_compatible: bool,
    #[serde(rename = "DynamicInfoAvailable")]
    pub dynamic_info_available: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatusRecord {
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "EvseStatus")]
    pub evse_status: EvseStatus,
}

/// Status records of all EVSEs of one operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorEvseStatus {
    #[serde(rename = "OperatorID")]
    pub operator_id: OperatorId,
    #[serde(rename = "OperatorName", skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(rename = "EvseStatusRecord", default)]
    pub evse_status_records: Vec<EvseStatusRecord>,
}
