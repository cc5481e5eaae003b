// Farmer identity record
//
// A farmer is keyed by mobile number for lookups and duplicate rejection.
// The bill history is the ordered list of bill ids created against the
// farmer; only the bill linking path appends to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::identifier::new_id;
use crate::core::{AppError, Result};

/// Registered seller identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    /// Bill ids in creation order
    #[serde(default)]
    pub bill_history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Farmer {
    /// Create a new farmer with validation
    ///
    /// Name and number are trimmed; empty values are rejected.
    pub fn new(name: &str, mobile_number: &str) -> Result<Self> {
        let name = Self::validate_name(name)?;
        let mobile_number = Self::validate_mobile_number(mobile_number)?;
        let now = Utc::now();

        Ok(Self {
            id: new_id(),
            name,
            mobile_number,
            bill_history: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub(crate) fn validate_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Farmer name cannot be empty"));
        }

        Ok(name.to_string())
    }

    pub(crate) fn validate_mobile_number(mobile_number: &str) -> Result<String> {
        let mobile_number = mobile_number.trim();
        if mobile_number.is_empty() {
            return Err(AppError::invalid_input("Farmer mobile number cannot be empty"));
        }

        Ok(mobile_number.to_string())
    }
}

/// Farmer listing entry used for search and autocomplete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FarmerSummary {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for farmer registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterFarmerRequest {
    #[serde(alias = "farmer_name")]
    pub name: String,
    #[serde(alias = "farmer_number")]
    pub mobile_number: String,
}

/// Request body for farmer updates; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFarmerRequest {
    #[serde(default, alias = "farmer_name")]
    pub name: Option<String>,
    #[serde(default, alias = "farmer_number")]
    pub mobile_number: Option<String>,
}

impl UpdateFarmerRequest {
    /// Apply the requested changes to `farmer`, validating each one
    pub fn apply_to(&self, farmer: &mut Farmer) -> Result<()> {
        if let Some(name) = &self.name {
            farmer.name = Farmer::validate_name(name)?;
        }

        if let Some(mobile_number) = &self.mobile_number {
            farmer.mobile_number = Farmer::validate_mobile_number(mobile_number)?;
        }

        farmer.updated_at = Utc::now();
        Ok(())
    }
}
