//! Folder and naming settings for locating instance, solution and plot files.

use crate::error::{MdvrpError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where instances and solutions live and where plots are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Folder holding instance files (named after the instance, no extension)
    pub instance_folder: PathBuf,
    /// Folder holding `<instance>.res` solution files
    pub solution_folder: PathBuf,
    /// Instance plotted when none is given
    pub default_instance_name: String,
    /// Folder receiving rendered plots and batch reports
    pub output_folder: PathBuf,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            instance_folder: PathBuf::from("./data/Testing Data/Data Files/"),
            solution_folder: PathBuf::from("./data/Solution files/"),
            default_instance_name: "p01".to_string(),
            output_folder: PathBuf::from("./plots/"),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MdvrpError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| MdvrpError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_instance_folder<P: Into<PathBuf>>(mut self, folder: P) -> Self {
        self.instance_folder = folder.into();
        self
    }

    pub fn with_solution_folder<P: Into<PathBuf>>(mut self, folder: P) -> Self {
        self.solution_folder = folder.into();
        self
    }

    pub fn with_default_instance_name(mut self, name: impl Into<String>) -> Self {
        self.default_instance_name = name.into();
        self
    }

    pub fn with_output_folder<P: Into<PathBuf>>(mut self, folder: P) -> Self {
        self.output_folder = folder.into();
        self
    }

    /// Path of the instance file called `name`.
    pub fn instance_path(&self, name: &str) -> PathBuf {
        self.instance_folder.join(name)
    }

    /// Path of the solution file for instance `name` (`<name>.res`).
    pub fn solution_path(&self, name: &str) -> PathBuf {
        self.solution_folder.join(format!("{}.res", name))
    }

    /// Path of a rendered artefact for instance `name`.
    pub fn output_path(&self, name: &str, extension: &str) -> PathBuf {
        self.output_folder.join(format!("{}.{}", name, extension))
    }

    /// Resolve an optional instance name against the default one.
    pub fn resolve_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        name.unwrap_or(&self.default_instance_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert_eq!(config.default_instance_name, "p01");
        assert_eq!(config.resolve_name(None), "p01");
        assert_eq!(config.resolve_name(Some("p07")), "p07");
    }

    #[test]
    fn test_paths() {
        let config = PlotConfig::new()
            .with_instance_folder("inst")
            .with_solution_folder("sol")
            .with_output_folder("out");

        assert_eq!(config.instance_path("p03"), Path::new("inst").join("p03"));
        assert_eq!(config.solution_path("p03"), Path::new("sol").join("p03.res"));
        assert_eq!(config.output_path("p03", "svg"), Path::new("out").join("p03.svg"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlotConfig =
            serde_json::from_str(r#"{"default_instance_name": "p12"}"#).unwrap();
        assert_eq!(config.default_instance_name, "p12");
        assert_eq!(config.instance_folder, PlotConfig::default().instance_folder);
    }
}
