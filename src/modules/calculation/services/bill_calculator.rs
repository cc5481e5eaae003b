use rust_decimal::Decimal;

use crate::modules::calculation::models::{CalculationInput, CalculationResult};

/// BillCalculator derives weights and amounts for a purchase bill
///
/// gross_weight          = filled_vehicle_weight - empty_vehicle_weight
/// net_sugarcane_weight  = gross_weight - binding_material
/// total_bill            = net_sugarcane_weight * sugarcane_rate
/// remaining_money       = total_bill - given_money
///
/// All arithmetic is exact decimal arithmetic. Nothing here can fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillCalculator;

impl BillCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, input: &CalculationInput) -> CalculationResult {
        let gross = input
            .filled_vehicle_weight
            .checked_sub(input.empty_vehicle_weight);
        let net = gross.and_then(|g| g.checked_sub(input.binding_material));
        let total = net.and_then(|n| Self::total_bill_raw(n, input.sugarcane_rate));
        let remaining = total.and_then(|t| t.checked_sub(input.given_money));

        CalculationResult {
            gross_weight: gross,
            net_sugarcane_weight: net.filter(Self::is_positive),
            total_bill: total.filter(Self::is_positive),
            remaining_money: remaining,
        }
    }

    /// Unsuppressed `net * rate`; `None` only on overflow
    pub fn total_bill_raw(net_sugarcane_weight: Decimal, sugarcane_rate: Decimal) -> Option<Decimal> {
        net_sugarcane_weight.checked_mul(sugarcane_rate)
    }

    fn is_positive(value: &Decimal) -> bool {
        *value > Decimal::ZERO
    }
}
