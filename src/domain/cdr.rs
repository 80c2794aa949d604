//! Charge detail records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::identification::Identification;
use super::identifiers::{EvseId, OperatorId, ProviderId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMeteringValue {
    #[serde(rename = "SignedMeteringValue", skip_serializing_if = "Option::is_none")]
    pub signed_metering_value: Option<String>,
    #[serde(rename = "MeteringStatus", skip_serializing_if = "Option::is_none")]
    pub metering_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterValuesInBetween {
    #[serde(rename = "meterValues")]
    pub meter_values: Vec<Decimal>,
}

/// Billing relevant data of a finished charging session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeDetailRecord {
    #[serde(rename = "SessionID")]
    pub session_id: SessionId,
    #[serde(rename = "CPOPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub cpo_partner_session_id: Option<String>,
    #[serde(rename = "EMPPartnerSessionID", skip_serializing_if = "Option::is_none")]
    pub emp_partner_session_id: Option<String>,
    #[serde(rename = "PartnerProductID", skip_serializing_if = "Option::is_none")]
    pub partner_product_id: Option<String>,
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "Identification")]
    pub identification: Identification,
    #[serde(rename = "ChargingStart")]
    pub charging_start: DateTime<Utc>,
    #[serde(rename = "ChargingEnd")]
    pub charging_end: DateTime<Utc>,
    #[serde(rename = "SessionStart")]
    pub session_start: DateTime<Utc>,
    #[serde(rename = "SessionEnd")]
    pub session_end: DateTime<Utc>,
    #[serde(rename = "MeterValueStart", skip_serializing_if = "Option::is_none")]
    pub meter_value_start: Option<Decimal>,
    #[serde(rename = "MeterValueEnd", skip_serializing_if = "Option::is_none")]
    pub meter_value_end: Option<Decimal>,
    #[serde(rename = "MeterValueInBetween", skip_serializing_if = "Option::is_none")]
    pub meter_value_in_between: Option<MeterValuesInBetween>,
    #[serde(rename = "ConsumedEnergy")]
    pub consumed_energy: Decimal,
    #[serde(rename = "SignedMeteringValues", default, skip_serializing_if = "Vec::is_empty")]
    pub signed_metering_values: Vec<SignedMeteringValue>,
    #[serde(rename = "HubOperatorID", skip_serializing_if = "Option::is_none")]
    pub hub_operator_id: Option<OperatorId>,
    #[serde(rename = "HubProviderID", skip_serializing_if = "Option::is_none")]
    pub hub_provider_id: Option<ProviderId>,
}

impl ChargeDetailRecord {
    pub fn charging_duration(&self) -> chrono::Duration {
        self.charging_end - self.charging_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_record() {
        let cdr: ChargeDetailRecord = serde_json::from_value(json!({
            "SessionID": "b2688855-7f00-0002-6d8e-48d498e8b1f2",
            "EvseID": "DE*ABC*E1",
            "Identification": { "RemoteIdentification": { "EvcoID": "DE-GDF-C12345678-X" } },
            "ChargingStart": "2024-05-01T10:00:00Z",
            "ChargingEnd": "2024-05-01T11:30:00Z",
            "SessionStart": "2024-05-01T09:58:00Z",
            "SessionEnd": "2024-05-01T11:31:00Z",
            "ConsumedEnergy": 23.5
        }))
        .unwrap();

        assert_eq!(cdr.charging_duration(), chrono::Duration::minutes(90));
        assert_eq!(cdr.consumed_energy, Decimal::new(235, 1));
        assert!(cdr.signed_metering_values.is_empty());
    }
}
