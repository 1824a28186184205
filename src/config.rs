//! Run configuration for the batch driver.
//!
//! A configuration file is optional YAML; any key left out falls back to the
//! defaults below, and command-line flags override whatever the file says.
//!
//! ```yaml
//! input_dir: 表格原文件
//! output_dir: 整理好名单
//! auto_detect: false
//! manual_names:
//!   name: 姓名
//!   phone: 手机
//!   id: 证件号
//! ```

use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Column headers used when automatic detection is switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualNames {
    pub name: String,
    pub phone: String,
    pub id: String,
}

impl Default for ManualNames {
    fn default() -> Self {
        Self {
            name: "姓名".to_string(),
            phone: "手机".to_string(),
            id: "证件号".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub auto_detect: bool,
    pub manual_names: ManualNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            auto_detect: true,
            manual_names: ManualNames::default(),
        }
    }
}

/// Command-line values layered on top of a loaded [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub manual: bool,
    pub name_column: Option<String>,
    pub phone_column: Option<String>,
    pub id_column: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config file {path:?}"))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise starts from the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).context("Serializing config")?;
        let mut file =
            File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        file.write_all(serialized.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Applies command-line overrides. Naming any column implies manual mode.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.input_dir {
            self.input_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        let named_any = overrides.name_column.is_some()
            || overrides.phone_column.is_some()
            || overrides.id_column.is_some();
        if overrides.manual || named_any {
            self.auto_detect = false;
        }
        if let Some(name) = overrides.name_column {
            self.manual_names.name = name;
        }
        if let Some(phone) = overrides.phone_column {
            self.manual_names.phone = phone;
        }
        if let Some(id) = overrides.id_column {
            self.manual_names.id = id;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("auto_detect: false\nmanual_names:\n  id: 身份证\n")
            .expect("parse config");
        assert!(!config.auto_detect);
        assert_eq!(config.input_dir, PathBuf::from("input"));
        assert_eq!(config.manual_names.name, "姓名");
        assert_eq!(config.manual_names.id, "身份证");
    }

    #[test]
    fn naming_a_column_switches_to_manual_mode() {
        let config = Config::default().apply(Overrides {
            phone_column: Some("联系电话".into()),
            ..Overrides::default()
        });
        assert!(!config.auto_detect);
        assert_eq!(config.manual_names.phone, "联系电话");
        assert_eq!(config.manual_names.name, "姓名");
    }

    #[test]
    fn overrides_replace_directories() {
        let config = Config::default().apply(Overrides {
            input_dir: Some("raw".into()),
            ..Overrides::default()
        });
        assert_eq!(config.input_dir, PathBuf::from("raw"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.auto_detect);
    }
}
