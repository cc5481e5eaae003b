use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::amount::RawAmount;

/// Raw scale and payment figures for one weighbridge ticket
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationInput {
    pub filled_vehicle_weight: Decimal,
    pub empty_vehicle_weight: Decimal,
    pub binding_material: Decimal,
    pub sugarcane_rate: Decimal,
    pub given_money: Decimal,
}

/// Calculation request body as sent by a client form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculationRequest {
    #[serde(default)]
    pub filled_vehicle_weight: Option<RawAmount>,
    #[serde(default)]
    pub empty_vehicle_weight: Option<RawAmount>,
    #[serde(default)]
    pub binding_material: Option<RawAmount>,
    #[serde(default)]
    pub sugarcane_rate: Option<RawAmount>,
    #[serde(default)]
    pub given_money: Option<RawAmount>,
}

impl CalculationRequest {
    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            filled_vehicle_weight: RawAmount::value_of(self.filled_vehicle_weight.as_ref()),
            empty_vehicle_weight: RawAmount::value_of(self.empty_vehicle_weight.as_ref()),
            binding_material: RawAmount::value_of(self.binding_material.as_ref()),
            sugarcane_rate: RawAmount::value_of(self.sugarcane_rate.as_ref()),
            given_money: RawAmount::value_of(self.given_money.as_ref()),
        }
    }
}

/// Derived billing figures
///
/// `net_sugarcane_weight` and `total_bill` are `None` when not positive.
/// `remaining_money` keeps its sign: a negative balance means over-payment.
/// Every field is `None` if the arithmetic overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    pub gross_weight: Option<Decimal>,
    pub net_sugarcane_weight: Option<Decimal>,
    pub total_bill: Option<Decimal>,
    pub remaining_money: Option<Decimal>,
}
