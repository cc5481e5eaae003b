use tracing::{info, warn};

use crate::core::identifier::parse_id;
use crate::core::{AppError, Result};
use crate::modules::farmers::models::{
    Farmer, FarmerSummary, RegisterFarmerRequest, UpdateFarmerRequest,
};
use crate::modules::farmers::repositories::FarmerRepository;

/// Service for the farmer directory
#[derive(Clone)]
pub struct FarmerService {
    farmer_repo: FarmerRepository,
}

impl FarmerService {
    pub fn new(farmer_repo: FarmerRepository) -> Self {
        Self { farmer_repo }
    }

    /// Register a farmer with an empty bill history
    ///
    /// # Errors
    /// * `InvalidInput` if name or mobile number is empty
    /// * `DuplicateFarmer` if the mobile number is already registered
    pub async fn register_farmer(&self, request: RegisterFarmerRequest) -> Result<Farmer> {
        let farmer = Farmer::new(&request.name, &request.mobile_number)?;

        if self
            .farmer_repo
            .find_by_mobile_number(&farmer.mobile_number)
            .await?
            .is_some()
        {
            warn!(
                mobile_number = %farmer.mobile_number,
                "Rejected duplicate farmer registration"
            );
            return Err(AppError::DuplicateFarmer(farmer.mobile_number));
        }

        // The unique index still guards against a concurrent registration
        let created = self.farmer_repo.create(&farmer).await?;

        info!(farmer_id = %created.id, mobile_number = %created.mobile_number, "Farmer registered");
        Ok(created)
    }

    /// Look up a farmer by mobile number
    pub async fn get_by_mobile_number(&self, mobile_number: &str) -> Result<Farmer> {
        self.farmer_repo
            .find_by_mobile_number(mobile_number.trim())
            .await?
            .ok_or_else(|| AppError::farmer_not_found(format!("mobile number '{}'", mobile_number)))
    }

    /// Look up a farmer by id
    ///
    /// # Errors
    /// * `InvalidIdentifier` if `id` is not a well-formed id
    /// * `FarmerNotFound` if no farmer has that id
    pub async fn get_by_id(&self, id: &str) -> Result<Farmer> {
        let id = parse_id(id)?;

        self.farmer_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::farmer_not_found(format!("id '{}'", id)))
    }

    /// List all farmers without bill history
    pub async fn list_farmers(&self) -> Result<Vec<FarmerSummary>> {
        self.farmer_repo.list_all().await
    }

    /// Update a farmer's name and/or mobile number
    ///
    /// Bills keep the snapshot taken when they were created.
    pub async fn update_farmer(&self, id: &str, request: UpdateFarmerRequest) -> Result<Farmer> {
        let mut farmer = self.get_by_id(id).await?;
        let previous_number = farmer.mobile_number.clone();

        request.apply_to(&mut farmer)?;
        self.farmer_repo.update(&farmer).await?;

        info!(
            farmer_id = %farmer.id,
            previous_number = %previous_number,
            mobile_number = %farmer.mobile_number,
            "Farmer updated"
        );
        Ok(farmer)
    }
}

// Service behavior against a real database is covered in
// tests/integration/farmer_registration_test.rs
