//! Dynamic pricing data

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::identifiers::{EvseId, OperatorId, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceUnit {
    Hour,
    KilowattHour,
    Minute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekDay {
    Everyday,
    Workdays,
    Weekend,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub begin: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAvailabilityTimes {
    #[serde(rename = "Periods")]
    pub periods: Vec<Period>,
    pub on: WeekDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingProductDataRecord {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ReferenceUnit")]
    pub reference_unit: ReferenceUnit,
    #[serde(rename = "ProductPriceCurrency")]
    pub product_price_currency: String,
    #[serde(rename = "PricePerReferenceUnit")]
    pub price_per_reference_unit: Decimal,
    #[serde(rename = "MaximumProductChargingPower")]
    pub maximum_product_charging_power: Decimal,
    #[serde(rename = "IsValid24hours")]
    pub is_valid_24_hours: bool,
    #[serde(rename = "ProductAvailabilityTimes", default)]
    pub product_availability_times: Vec<ProductAvailabilityTimes>,
}

/// Pricing products one operator offers to one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingProductData {
    #[serde(rename = "OperatorID")]
    pub operator_id: OperatorId,
    #[serde(rename = "OperatorName", skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "PricingDefaultPrice")]
    pub pricing_default_price: Decimal,
    #[serde(rename = "PricingDefaultPriceCurrency")]
    pub pricing_default_price_currency: String,
    #[serde(rename = "PricingDefaultReferenceUnit")]
    pub pricing_default_reference_unit: ReferenceUnit,
    #[serde(rename = "PricingProductDataRecords", default)]
    pub pricing_product_data_records: Vec<PricingProductDataRecord>,
}

/// Products applicable to a single EVSE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvsePricing {
    #[serde(rename = "EvseID")]
    pub evse_id: EvseId,
    #[serde(rename = "ProviderID")]
    pub provider_id: ProviderId,
    #[serde(rename = "EvseIDProductList", default)]
    pub evse_id_product_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorEvsePricing {
    #[serde(rename = "OperatorID")]
    pub operator_id: OperatorId,
    #[serde(rename = "OperatorName", skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(rename = "EVSEPricing", default)]
    pub evse_pricing: Vec<EvsePricing>,
}
