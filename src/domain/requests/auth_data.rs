//! Authentication data push

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::OicpRequest;
use crate::domain::acknowledgement::Acknowledgement;
use crate::domain::identification::Identification;
use crate::domain::identifiers::ProviderId;
use crate::domain::operation::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "fullLoad")]
    FullLoad,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "insert")]
    Insert,
    #[serde(rename = "delete")]
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationDataRecord {
    #[serde(rename = "Identification")]
    pub identification: Identification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAuthenticationData {
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "AuthenticationDataRecord", default)]
    pub authentication_data_records: Vec<AuthenticationDataRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PushAuthenticationDataRequest {
    #[serde(rename = "ActionType")]
    pub action_type: ActionType,
    #[serde(rename = "ProviderAuthenticationData")]
    pub provider_authentication_data: ProviderAuthenticationData,
}

impl OicpRequest for PushAuthenticationDataRequest {
    type Response = Acknowledgement;
    const OPERATION: Operation = Operation::PushAuthenticationData;

    fn provider_id(&self) -> &ProviderId {
        &self.provider_authentication_data.provider_id
    }

    fn check(&self) -> Result<(), String> {
        let empty = self
            .provider_authentication_data
            .authentication_data_records
            .is_empty();
        if empty && self.action_type != ActionType::FullLoad {
            return Err(format!(
                "AuthenticationDataRecord must not be empty for action type {:?}",
                self.action_type
            ));
        }
        Ok(())
    }
}
