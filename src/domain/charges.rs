//! Per-container charge tallies.

use crate::domain::rules::RuleSet;
use crate::domain::service_row::ServiceRow;
use rust_decimal::Decimal;

/// The five cost buckets of a summary record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Charges {
    pub freight: Decimal,
    pub yard_pickup: Decimal,
    pub axle_surcharge: Decimal,
    pub return_trip: Decimal,
    pub extra_costs: Decimal,
}

impl Charges {
    /// Sum row amounts into buckets. Rows with a malformed amount count as zero.
    pub fn tally<'a, I>(rows: I, rules: &RuleSet) -> Self
    where
        I: IntoIterator<Item = &'a ServiceRow>,
    {
        let mut charges = Self::default();
        for row in rows {
            let amount = row.amount.unwrap_or_default();
            let service = row.service.trim();
            let kind = row.kind.trim();

            if kind == rules.guide_kind {
                if rules.is_yard_pickup(service) {
                    charges.yard_pickup += amount;
                } else {
                    charges.freight += amount;
                }
            } else if kind == rules.additional_kind {
                if service == rules.axle_service {
                    charges.axle_surcharge += amount;
                }
                if service.starts_with(&rules.return_prefix) {
                    charges.return_trip += amount;
                }
            }

            // Independent of kind: ancillary fees may be booked under any "Tipo".
            if rules.is_extra_cost(service) {
                charges.extra_costs += amount;
            }
        }
        charges
    }

    pub fn total(&self) -> Decimal {
        self.freight + self.yard_pickup + self.axle_surcharge + self.return_trip + self.extra_costs
    }
}
