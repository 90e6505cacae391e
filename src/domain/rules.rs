//! Classification and charge catalogs.
//!
//! All catalogs live in a [`RuleSet`] value that is passed explicitly to the
//! classifier, the aggregator and the comment synthesizer. The defaults match
//! the production report; any list can be replaced from an INI file through
//! [`RuleSet::from_config`].

use crate::domain::error::ConverterError;
use crate::ports::config_port::ConfigPort;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_EXPORT_SERVICES: &[&str] = &[
    "Recoge contenedor para export",
    "Carrusel export",
    "Movimiento de exportacion",
    "Retira full export",
];

pub const DEFAULT_COYOL_SERVICES: &[&str] = &["Movimiento de export", "Retira full export"];

pub const DEFAULT_EXTRA_COSTS: &[&str] = &[
    "Demora de Chasis Sencillo",
    "Diesel Adicional",
    "Gen Set Diario",
    "Demora de Chasis Equipo Especial",
    "Choferes Quimiquero",
    "Diesel para viaje",
    "Estadía en Chasis 3 Ejes",
];

/// Per-day rates for ancillary services whose amount encodes a day count.
pub const DEFAULT_DAILY_RATES: &[(&str, i64)] = &[("Demora de Chasis Sencillo", 45)];

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub export_services: BTreeSet<String>,
    pub coyol_services: BTreeSet<String>,
    /// Ancillary fee types summed into the extra-cost column.
    pub extra_costs: BTreeSet<String>,
    /// Service type to daily rate. Keys need not appear in `extra_costs`.
    pub daily_rates: Vec<(String, Decimal)>,
    pub guide_kind: String,
    pub additional_kind: String,
    /// Export empty-container pickup, compared case-insensitively.
    pub yard_pickup_service: String,
    pub axle_service: String,
    pub return_prefix: String,
    /// Hazardous-cargo driver fee, compared case-insensitively.
    pub hazmat_service: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            export_services: owned_set(DEFAULT_EXPORT_SERVICES),
            coyol_services: owned_set(DEFAULT_COYOL_SERVICES),
            extra_costs: owned_set(DEFAULT_EXTRA_COSTS),
            daily_rates: DEFAULT_DAILY_RATES
                .iter()
                .map(|(name, rate)| (name.to_string(), Decimal::from(*rate)))
                .collect(),
            guide_kind: "Guía".to_string(),
            additional_kind: "Cargo Adicional Guía".to_string(),
            yard_pickup_service: "Retira vacio export".to_string(),
            axle_service: "Sobre Peso 3 ejes".to_string(),
            return_prefix: "SJO-RT".to_string(),
            hazmat_service: "Choferes Quimiquero".to_string(),
        }
    }
}

fn owned_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSet {
    pub fn is_export_service(&self, service: &str) -> bool {
        self.export_services.contains(service)
    }

    pub fn is_coyol_service(&self, service: &str) -> bool {
        self.coyol_services.contains(service)
    }

    pub fn is_extra_cost(&self, service: &str) -> bool {
        self.extra_costs.contains(service)
    }

    pub fn is_yard_pickup(&self, service: &str) -> bool {
        service.trim().to_lowercase() == self.yard_pickup_service.to_lowercase()
    }

    pub fn is_hazmat(&self, service: &str) -> bool {
        service.trim().to_lowercase() == self.hazmat_service.to_lowercase()
    }

    pub fn daily_rate(&self, service: &str) -> Option<Decimal> {
        self.daily_rates
            .iter()
            .find(|(name, _)| name == service)
            .map(|(_, rate)| *rate)
    }

    /// Build a rule set from configuration, falling back to the defaults for
    /// any key that is absent.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ConverterError> {
        let mut rules = Self::default();

        if let Some(list) = read_list(config, "classification", "export_services")? {
            rules.export_services = list.into_iter().collect();
        }
        if let Some(list) = read_list(config, "classification", "coyol_services")? {
            rules.coyol_services = list.into_iter().collect();
        }
        if let Some(list) = read_list(config, "charges", "extra_costs")? {
            rules.extra_costs = list.into_iter().collect();
        }
        if let Some(list) = read_list(config, "daily_rates", "rates")? {
            rules.daily_rates = list
                .iter()
                .map(|entry| parse_rate(entry))
                .collect::<Result<_, _>>()?;
        }

        let scalars: [(&str, &mut String); 6] = [
            ("guide_kind", &mut rules.guide_kind),
            ("additional_kind", &mut rules.additional_kind),
            ("yard_pickup_service", &mut rules.yard_pickup_service),
            ("axle_service", &mut rules.axle_service),
            ("return_prefix", &mut rules.return_prefix),
            ("hazmat_service", &mut rules.hazmat_service),
        ];
        for (key, slot) in scalars {
            if let Some(value) = config.get_string("charges", key) {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ConverterError::ConfigInvalid {
                        section: "charges".into(),
                        key: key.into(),
                        reason: "value must not be empty".into(),
                    });
                }
                *slot = value.to_string();
            }
        }

        Ok(rules)
    }
}

fn read_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Vec<String>>, ConverterError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    let items: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return Err(ConverterError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: "list must contain at least one entry".into(),
        });
    }
    Ok(Some(items))
}

fn parse_rate(entry: &str) -> Result<(String, Decimal), ConverterError> {
    let invalid = |reason: String| ConverterError::ConfigInvalid {
        section: "daily_rates".into(),
        key: "rates".into(),
        reason,
    };
    let (name, rate) = entry
        .rsplit_once(':')
        .ok_or_else(|| invalid(format!("expected service:rate, got \"{entry}\"")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid(format!("missing service name in \"{entry}\"")));
    }
    let rate = Decimal::from_str(rate.trim())
        .map_err(|_| invalid(format!("rate for {name} is not a number")))?;
    if rate <= Decimal::ZERO {
        return Err(invalid(format!("rate for {name} must be positive")));
    }
    Ok((name.to_string(), rate))
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
        writeln!(f, "[classification]")?;
        writeln!(f, "  export_services: {}", join(&self.export_services))?;
        writeln!(f, "  coyol_services:  {}", join(&self.coyol_services))?;
        writeln!(f, "[charges]")?;
        writeln!(f, "  guide_kind:          {}", self.guide_kind)?;
        writeln!(f, "  additional_kind:     {}", self.additional_kind)?;
        writeln!(f, "  yard_pickup_service: {}", self.yard_pickup_service)?;
        writeln!(f, "  axle_service:        {}", self.axle_service)?;
        writeln!(f, "  return_prefix:       {}", self.return_prefix)?;
        writeln!(f, "  hazmat_service:      {}", self.hazmat_service)?;
        writeln!(f, "  extra_costs:         {}", join(&self.extra_costs))?;
        writeln!(f, "[daily_rates]")?;
        for (name, rate) in &self.daily_rates {
            writeln!(f, "  {name}: {rate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_contain_production_lists() {
        let rules = RuleSet::default();
        assert!(rules.is_export_service("Carrusel export"));
        assert!(rules.is_coyol_service("Movimiento de export"));
        assert!(!rules.is_coyol_service("Carrusel export"));
        assert!(rules.is_extra_cost("Estadía en Chasis 3 Ejes"));
        assert_eq!(
            rules.daily_rate("Demora de Chasis Sencillo"),
            Some(Decimal::from(45))
        );
        assert_eq!(rules.daily_rate("Diesel Adicional"), None);
    }

    #[test]
    fn yard_pickup_ignores_case() {
        let rules = RuleSet::default();
        assert!(rules.is_yard_pickup("RETIRA VACIO EXPORT"));
        assert!(rules.is_yard_pickup("Retira vacio export"));
        assert!(!rules.is_yard_pickup("Retira full export"));
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let adapter = FileConfigAdapter::from_string("[output]\nformat = xlsx\n").unwrap();
        let rules = RuleSet::from_config(&adapter).unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn config_overrides_lists_and_rates() {
        let ini = r#"
[classification]
export_services = Carrusel export, Otro export

[charges]
return_prefix = LIO-RT

[daily_rates]
rates = Gen Set Diario:80, Demora de Chasis Sencillo:50.5
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let rules = RuleSet::from_config(&adapter).unwrap();

        assert!(rules.is_export_service("Otro export"));
        assert!(!rules.is_export_service("Retira full export"));
        assert_eq!(rules.return_prefix, "LIO-RT");
        assert_eq!(rules.daily_rate("Gen Set Diario"), Some(Decimal::from(80)));
        assert_eq!(
            rules.daily_rate("Demora de Chasis Sencillo"),
            Some(Decimal::new(505, 1))
        );
        assert_eq!(rules.coyol_services, RuleSet::default().coyol_services);
    }

    #[test]
    fn non_positive_rate_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[daily_rates]\nrates = Gen Set Diario:0\n").unwrap();
        let err = RuleSet::from_config(&adapter).unwrap_err();
        assert!(
            matches!(err, ConverterError::ConfigInvalid { section, .. } if section == "daily_rates")
        );
    }

    #[test]
    fn malformed_rate_entry_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[daily_rates]\nrates = Gen Set Diario\n").unwrap();
        assert!(RuleSet::from_config(&adapter).is_err());
    }

    #[test]
    fn empty_list_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[classification]\nexport_services = , ,\n").unwrap();
        let err = RuleSet::from_config(&adapter).unwrap_err();
        assert!(
            matches!(err, ConverterError::ConfigInvalid { key, .. } if key == "export_services")
        );
    }
}
