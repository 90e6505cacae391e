//! Per-container aggregation into summary records.

use crate::domain::category::Category;
use crate::domain::charges::Charges;
use crate::domain::comment;
use crate::domain::error::ContainerError;
use crate::domain::rules::RuleSet;
use crate::domain::service_row::ServiceRow;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static DROP_OFF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)descarga(.*?)\*").expect("drop-off pattern is valid")
});

/// One output line per container group.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub category: Category,
    pub container: String,
    pub booking: String,
    pub placement_date: NaiveDate,
    pub origin_port: String,
    pub drop_off_address: String,
    pub empty_return: String,
    pub charges: Charges,
    pub tta_comment: String,
}

impl SummaryRecord {
    pub fn total(&self) -> rust_decimal::Decimal {
        self.charges.total()
    }
}

/// Rows of one category grouped by container, in first-appearance order.
#[derive(Debug, Clone)]
pub struct ContainerGroup<'a> {
    pub category: Category,
    pub container: String,
    pub rows: Vec<&'a ServiceRow>,
}

/// Group rows by container identifier, keeping the input order of both the
/// groups and the rows inside each group.
pub fn group_by_container<'a>(
    category: Category,
    rows: impl IntoIterator<Item = &'a ServiceRow>,
) -> Vec<ContainerGroup<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ContainerGroup<'a>> = Vec::new();
    for row in rows {
        let key = row.container.trim().to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ContainerGroup {
                category,
                container: key,
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }
    groups
}

/// Reduce one container group to its summary record.
pub fn aggregate(
    group: &ContainerGroup<'_>,
    rules: &RuleSet,
) -> Result<SummaryRecord, ContainerError> {
    if let Some(pos) = group.rows.iter().position(|r| r.amount.is_none()) {
        return Err(ContainerError::InvalidAmount { row: pos + 1 });
    }

    let (guide_pos, first_guide) = group
        .rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.kind.trim() == rules.guide_kind)
        .ok_or(ContainerError::NoGuideCharge)?;

    let placement_date = first_guide
        .arrival
        .map(|dt| dt.date())
        .ok_or(ContainerError::MissingArrival { row: guide_pos + 1 })?;

    let charges = Charges::tally(group.rows.iter().copied(), rules);
    let tta_comment = comment::synthesize_with(&group.rows, &charges, rules);

    Ok(SummaryRecord {
        category: group.category,
        container: group.container.clone(),
        booking: extract_booking(&group.rows),
        placement_date,
        origin_port: group
            .rows
            .first()
            .map(|r| r.origin.trim().to_string())
            .unwrap_or_default(),
        drop_off_address: extract_drop_off(&group.rows, rules),
        empty_return: first_guide.final_location.trim().to_string(),
        charges,
        tta_comment,
    })
}

/// First whitespace-separated token holding an ASCII digit, scanning notes in
/// arrival order. Rows without an arrival sort after those with one.
pub fn extract_booking(rows: &[&ServiceRow]) -> String {
    let mut ordered: Vec<&ServiceRow> = rows.to_vec();
    ordered.sort_by_key(|r| (r.arrival.is_none(), r.arrival));
    ordered
        .iter()
        .flat_map(|r| r.notes.split_whitespace())
        .find(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Text between "Descarga" and the next "*" in guide-charge notes.
pub fn extract_drop_off(rows: &[&ServiceRow], rules: &RuleSet) -> String {
    rows.iter()
        .filter(|r| r.kind.trim() == rules.guide_kind)
        .find_map(|r| DROP_OFF_RE.captures(&r.notes))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
