//! Batch conversion: classify, group, aggregate and build every category.

use crate::domain::aggregator::{aggregate, group_by_container, SummaryRecord};
use crate::domain::category::Category;
use crate::domain::classifier::classify;
use crate::domain::error::ContainerWarning;
use crate::domain::report::{self, SummaryTable};
use crate::domain::rules::RuleSet;
use crate::domain::service_row::ServiceRow;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Result of converting one report.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// One table per category that produced at least one record, in
    /// [`Category::ALL`] order.
    pub tables: Vec<SummaryTable>,
    pub warnings: Vec<ContainerWarning>,
    pub classified_rows: usize,
    pub unclassified_rows: usize,
}

impl Conversion {
    pub fn table(&self, category: Category) -> Option<&SummaryTable> {
        self.tables.iter().find(|t| t.category == category)
    }
}

/// Rows partitioned by category, input order preserved inside each bucket.
pub fn partition<'a>(
    rows: &'a [ServiceRow],
    rules: &RuleSet,
) -> (BTreeMap<Category, Vec<&'a ServiceRow>>, usize) {
    let mut buckets: BTreeMap<Category, Vec<&ServiceRow>> = BTreeMap::new();
    let mut unclassified = 0;
    for row in rows {
        match classify(row, rules) {
            Some(category) => buckets.entry(category).or_default().push(row),
            None => unclassified += 1,
        }
    }
    (buckets, unclassified)
}

/// Aggregate every container of one category, collecting failures.
pub fn aggregate_category(
    category: Category,
    rows: &[&ServiceRow],
    rules: &RuleSet,
) -> (Vec<SummaryRecord>, Vec<ContainerWarning>) {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for group in group_by_container(category, rows.iter().copied()) {
        match aggregate(&group, rules) {
            Ok(record) => records.push(record),
            Err(error) => {
                let warning = ContainerWarning {
                    category,
                    container: group.container.clone(),
                    error,
                };
                log::warn!("skipping container {warning}");
                warnings.push(warning);
            }
        }
    }
    (records, warnings)
}

pub fn convert(rows: &[ServiceRow], rules: &RuleSet, timestamp: NaiveDateTime) -> Conversion {
    let (buckets, unclassified_rows) = partition(rows, rules);
    let classified_rows = rows.len() - unclassified_rows;
    log::info!(
        "classified {} of {} rows ({} unclassified)",
        classified_rows,
        rows.len(),
        unclassified_rows
    );

    let mut tables = Vec::new();
    let mut warnings = Vec::new();

    // BTreeMap iteration follows the enum declaration order, same as Category::ALL.
    for (category, bucket) in &buckets {
        let (records, mut skipped) = aggregate_category(*category, bucket, rules);
        warnings.append(&mut skipped);
        if records.is_empty() {
            log::info!("{category}: no containers to report");
            continue;
        }
        log::info!("{category}: {} containers", records.len());
        tables.push(report::build(*category, records, timestamp));
    }

    Conversion {
        tables,
        warnings,
        classified_rows,
        unclassified_rows,
    }
}
