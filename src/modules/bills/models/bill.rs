// Bill: one sugarcane purchase linked to exactly one farmer
//
// The farmer's name and number are copied onto the bill when it is created
// and never re-synced. Derived figures (net weight, remaining money) are
// cached from the calculator and can always be recomputed from the raw
// inputs stored next to them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::amount::{format_money, RawAmount};
use crate::core::identifier::new_id;
use crate::core::{AppError, Result};
use crate::modules::calculation::{BillCalculator, CalculationInput, CalculationResult};
use crate::modules::farmers::Farmer;

/// Point-in-time copy of the farmer identity printed on a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerSnapshot {
    pub farmer_name: String,
    pub farmer_number: String,
}

impl FarmerSnapshot {
    pub fn of(farmer: &Farmer) -> Self {
        Self {
            farmer_name: farmer.name.clone(),
            farmer_number: farmer.mobile_number.clone(),
        }
    }
}

/// Validated transaction fields of a bill
#[derive(Debug, Clone, PartialEq)]
pub struct BillFields {
    pub driver_name: String,
    pub sugarcane_quality: String,
    pub vehicle_type: String,
    pub cutter: String,
    pub payment_type: String,
    pub amounts: CalculationInput,
}

/// Purchase transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub farmer_id: String,
    #[serde(flatten)]
    pub snapshot: FarmerSnapshot,
    pub driver_name: String,
    pub sugarcane_quality: String,
    pub vehicle_type: String,
    pub cutter: String,
    pub filled_vehicle_weight: Decimal,
    pub empty_vehicle_weight: Decimal,
    pub binding_material: Decimal,
    /// Net weight, unset when not positive
    pub only_sugarcane_weight: Option<Decimal>,
    pub sugarcane_rate: Decimal,
    pub given_money: Decimal,
    /// Balance still owed to the farmer; negative on over-payment
    pub remaining_money: Option<Decimal>,
    pub payment_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Build a new bill for `farmer`, snapshotting its identity
    pub fn new(farmer: &Farmer, fields: BillFields) -> Self {
        let now = Utc::now();

        let mut bill = Self {
            id: new_id(),
            farmer_id: farmer.id.clone(),
            snapshot: FarmerSnapshot::of(farmer),
            driver_name: String::new(),
            sugarcane_quality: String::new(),
            vehicle_type: String::new(),
            cutter: String::new(),
            filled_vehicle_weight: Decimal::ZERO,
            empty_vehicle_weight: Decimal::ZERO,
            binding_material: Decimal::ZERO,
            only_sugarcane_weight: None,
            sugarcane_rate: Decimal::ZERO,
            given_money: Decimal::ZERO,
            remaining_money: None,
            payment_type: String::new(),
            created_at: now,
            updated_at: now,
        };

        bill.apply_fields(fields);
        bill.updated_at = bill.created_at;
        bill
    }

    /// Replace the transaction fields and refresh the derived figures
    ///
    /// Identity, snapshot and `created_at` are left alone.
    pub fn apply_fields(&mut self, fields: BillFields) {
        self.driver_name = fields.driver_name;
        self.sugarcane_quality = fields.sugarcane_quality;
        self.vehicle_type = fields.vehicle_type;
        self.cutter = fields.cutter;
        self.payment_type = fields.payment_type;
        self.filled_vehicle_weight = fields.amounts.filled_vehicle_weight;
        self.empty_vehicle_weight = fields.amounts.empty_vehicle_weight;
        self.binding_material = fields.amounts.binding_material;
        self.sugarcane_rate = fields.amounts.sugarcane_rate;
        self.given_money = fields.amounts.given_money;

        let result = self.recalculate();
        self.only_sugarcane_weight = result.net_sugarcane_weight;
        self.remaining_money = result.remaining_money;
        self.updated_at = Utc::now();
    }

    pub fn calculation_input(&self) -> CalculationInput {
        CalculationInput {
            filled_vehicle_weight: self.filled_vehicle_weight,
            empty_vehicle_weight: self.empty_vehicle_weight,
            binding_material: self.binding_material,
            sugarcane_rate: self.sugarcane_rate,
            given_money: self.given_money,
        }
    }

    /// Derived figures recomputed from the stored raw inputs
    pub fn recalculate(&self) -> CalculationResult {
        BillCalculator::new().calculate(&self.calculation_input())
    }

    /// Total bill recomputed from the stored raw inputs
    pub fn total_bill(&self) -> Option<Decimal> {
        self.recalculate().total_bill
    }

    /// Plain-text summary for sharing over messaging apps
    pub fn share_text(&self) -> String {
        let result = self.recalculate();
        let money = |v: Option<Decimal>| v.map(format_money).unwrap_or_else(|| "-".to_string());

        format!(
            "Farmer Bill Details\n\
             Date: {}\n\
             Farmer: {}\n\
             Mobile: {}\n\
             Driver: {}\n\
             Vehicle: {}\n\
             Quality: {}\n\
             Weight: {} kg\n\
             Rate: ₹{}/kg\n\
             Total: ₹{}\n\
             Given: ₹{}\n\
             Remaining: ₹{}\n\
             Payment: {}",
            self.created_at.format("%d/%m/%Y"),
            self.snapshot.farmer_name,
            self.snapshot.farmer_number,
            self.driver_name,
            self.vehicle_type,
            self.sugarcane_quality,
            result
                .net_sugarcane_weight
                .map(|w| w.normalize().to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.sugarcane_rate.normalize(),
            money(result.total_bill),
            format_money(self.given_money),
            money(result.remaining_money),
            self.payment_type,
        )
    }
}

/// Transaction fields as sent by a client
///
/// Numeric fields take numbers or numeric strings; anything else reads as
/// zero. Client-computed `only_sugarcane_weight` / `remaining_money` are
/// ignored, the server always derives them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillFieldsRequest {
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub sugarcane_quality: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub cutter: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
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

impl BillFieldsRequest {
    /// Validate and convert into typed bill fields
    ///
    /// # Errors
    /// * `InvalidInput` if any numeric input is negative
    pub fn validate(&self) -> Result<BillFields> {
        let amounts = CalculationInput {
            filled_vehicle_weight: Self::non_negative(
                "filled_vehicle_weight",
                self.filled_vehicle_weight.as_ref(),
            )?,
            empty_vehicle_weight: Self::non_negative(
                "empty_vehicle_weight",
                self.empty_vehicle_weight.as_ref(),
            )?,
            binding_material: Self::non_negative(
                "binding_material",
                self.binding_material.as_ref(),
            )?,
            sugarcane_rate: Self::non_negative("sugarcane_rate", self.sugarcane_rate.as_ref())?,
            given_money: Self::non_negative("given_money", self.given_money.as_ref())?,
        };

        Ok(BillFields {
            driver_name: Self::text(&self.driver_name),
            sugarcane_quality: Self::text(&self.sugarcane_quality),
            vehicle_type: Self::text(&self.vehicle_type),
            cutter: Self::text(&self.cutter),
            payment_type: Self::text(&self.payment_type),
            amounts,
        })
    }

    fn text(value: &Option<String>) -> String {
        value.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    fn non_negative(field: &str, raw: Option<&RawAmount>) -> Result<Decimal> {
        let value = RawAmount::value_of(raw);
        if value < Decimal::ZERO {
            return Err(AppError::invalid_input(format!(
                "{} cannot be negative, got: {}",
                field, value
            )));
        }

        Ok(value)
    }
}

/// Request body for creating a bill against a registered farmer
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBillRequest {
    /// Mobile number of the farmer the bill belongs to
    #[serde(alias = "farmer_number")]
    pub mobile_number: String,
    #[serde(flatten)]
    pub fields: BillFieldsRequest,
}

impl CreateBillRequest {
    /// Validate the request before any store access
    ///
    /// # Returns
    /// * trimmed mobile number and typed bill fields
    pub fn validate(&self) -> Result<(String, BillFields)> {
        let mobile_number = self.mobile_number.trim();
        if mobile_number.is_empty() {
            return Err(AppError::invalid_input("Farmer mobile number is required"));
        }

        Ok((mobile_number.to_string(), self.fields.validate()?))
    }
}

/// Request body for replacing a bill's transaction fields
pub type UpdateBillRequest = BillFieldsRequest;
