//! Row classification into trade-direction categories.

use crate::domain::category::Category;
use crate::domain::rules::RuleSet;
use crate::domain::service_row::ServiceRow;

/// Assign a row to a category, or `None` when it belongs to no report.
pub fn classify(row: &ServiceRow, rules: &RuleSet) -> Option<Category> {
    classify_fields(&row.route, &row.service, rules)
}

/// Ordered rules, first match wins. The route prefix match is case-sensitive.
pub fn classify_fields(route: &str, service: &str, rules: &RuleSet) -> Option<Category> {
    let route = route.trim();
    let service = service.trim();
    let export = rules.is_export_service(service);

    if route.starts_with("CAL") && export {
        Some(Category::ExportCaldera)
    } else if route.starts_with("SJO") && rules.is_coyol_service(service) {
        Some(Category::ExportCoyol)
    } else if route.starts_with("Lio") && export {
        Some(Category::ExportLimon)
    } else if route.starts_with("CAL") {
        Some(Category::ImportCaldera)
    } else if route.starts_with("Lio") {
        Some(Category::ImportLimon)
    } else {
        None
    }
}
