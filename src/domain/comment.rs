//! Human-readable charge trail for the "COMENTARIOS TTA" column.

use crate::domain::charges::Charges;
use crate::domain::rules::RuleSet;
use crate::domain::service_row::ServiceRow;
use rust_decimal::Decimal;

pub const SEPARATOR: &str = " | ";

pub const FREIGHT_LABEL: &str = "Flete";
pub const YARD_PICKUP_LABEL: &str = "Patio de Retiro";
pub const AXLE_LABEL: &str = "3 Ejes";
pub const RETURN_LABEL: &str = "Retorno";
pub const HAZMAT_LABEL: &str = "IMO";

/// Build the comment for one container group.
pub fn synthesize(rows: &[&ServiceRow], rules: &RuleSet) -> String {
    let charges = Charges::tally(rows.iter().copied(), rules);
    synthesize_with(rows, &charges, rules)
}

/// Same as [`synthesize`] when the tally is already at hand.
pub fn synthesize_with(rows: &[&ServiceRow], charges: &Charges, rules: &RuleSet) -> String {
    let mut parts: Vec<String> = [
        (charges.freight, FREIGHT_LABEL),
        (charges.yard_pickup, YARD_PICKUP_LABEL),
        (charges.axle_surcharge, AXLE_LABEL),
        (charges.return_trip, RETURN_LABEL),
    ]
    .iter()
    .filter(|(sum, _)| *sum > Decimal::ZERO)
    .map(|(_, label)| label.to_string())
    .collect();

    // One entry per row, repeated service types included.
    for row in rows {
        let service = row.service.trim();
        let (Some(rate), Some(amount)) = (rules.daily_rate(service), row.amount) else {
            continue;
        };
        let Some(ratio) = amount.checked_div(rate) else {
            continue;
        };
        let days = ratio.round().normalize();
        parts.push(format!("{service} ({days} días)"));
    }

    let hazmat: Decimal = rows
        .iter()
        .filter(|r| rules.is_hazmat(&r.service))
        .filter_map(|r| r.amount)
        .sum();
    if hazmat > Decimal::ZERO {
        parts.push(HAZMAT_LABEL.to_string());
    }

    parts.join(SEPARATOR)
}
