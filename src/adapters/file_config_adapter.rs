//! INI file configuration adapter.
//!
//! Keys are case-insensitive, values keep their case. Both `=` and `:` split a
//! key from its value; the first one on the line wins, so
//! `rates = Gen Set Diario: 30` keeps the colon inside the value.

use crate::domain::error::ConverterError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConverterError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| ConverterError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ConverterError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ConverterError::ConfigParse {
                file: "<inline>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// An adapter with no keys, so every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        let Some(raw) = self.config.get(section, key) else {
            return default;
        };
        parse_flag(&raw).unwrap_or_else(|| {
            log::warn!("[{section}] {key} = \"{raw}\" is not a boolean, using {default}");
            default
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn list_values_read_verbatim() {
        let content = r#"
[classification]
export_services = Carrusel export, Retira full export

[output]
directory = outputs
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("classification", "export_services"),
            Some("Carrusel export, Retira full export".to_string())
        );
        assert_eq!(
            adapter.get_string("output", "directory"),
            Some("outputs".to_string())
        );
    }

    #[test]
    fn values_keep_their_case() {
        let adapter = FileConfigAdapter::from_string("[charges]\nguide_kind = Guía\n").unwrap();
        assert_eq!(
            adapter.get_string("charges", "guide_kind"),
            Some("Guía".to_string())
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Output]\nSheet_Name = Resumen\n").unwrap();
        assert_eq!(
            adapter.get_string("output", "sheet_name"),
            Some("Resumen".to_string())
        );
    }

    #[test]
    fn colon_inside_value_is_preserved() {
        let adapter =
            FileConfigAdapter::from_string("[daily_rates]\nrates = Gen Set Diario:80\n").unwrap();
        assert_eq!(
            adapter.get_string("daily_rates", "rates"),
            Some("Gen Set Diario:80".to_string())
        );
    }

    #[test]
    fn missing_keys_are_none() {
        let adapter = FileConfigAdapter::from_string("[output]\nformat = csv\n").unwrap();
        assert_eq!(adapter.get_string("output", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert_eq!(
            FileConfigAdapter::empty().get_string("output", "format"),
            None
        );
    }

    #[test]
    fn autofit_flag_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[output]\na = true\nb = Yes\nc = on\nd = 0\ne = no\nf = OFF\n",
        )
        .unwrap();
        for key in ["a", "b", "c"] {
            assert!(adapter.get_bool("output", key, false), "{key}");
        }
        for key in ["d", "e", "f"] {
            assert!(!adapter.get_bool("output", key, true), "{key}");
        }
    }

    #[test]
    fn unrecognised_or_missing_flag_uses_default() {
        let adapter = FileConfigAdapter::from_string("[output]\nautofit = maybe\n").unwrap();
        assert!(adapter.get_bool("output", "autofit", true));
        assert!(!adapter.get_bool("output", "autofit", false));
        assert!(adapter.get_bool("output", "absent", true));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[output]\nsheet_name = TO\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "sheet_name"),
            Some("TO".to_string())
        );
    }

    #[test]
    fn missing_file_is_config_parse_error() {
        let err = match FileConfigAdapter::from_file("/nonexistent/path/config.ini") {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(
            matches!(err, ConverterError::ConfigParse { file, .. } if file.ends_with("config.ini"))
        );
    }
}
