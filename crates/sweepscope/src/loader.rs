//! Dataset file loading
//!
//! A run is stored as one JSON document:
//!
//! ```json
//! {
//!   "name": "run 12",
//!   "axes": [{"name": "freq", "unit": "Hz", "values": [5.0e9, 5.1e9]}],
//!   "variables": [{"name": "q1__state", "dims": ["freq"], "values": [0.1, 0.7]}],
//!   "metadata": {"parallel_sweep_axes": "{'0': ['freq']}"}
//! }
//! ```
//!
//! Variable values are flat and row-major over `dims`. `null` entries load as
//! NaN (missing samples of an interrupted run).

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use sweepscope_core::{Dataset, DatasetBuilder};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisFile {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableFile {
    pub name: String,
    pub dims: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    #[serde(default)]
    pub name: String,
    pub axes: Vec<AxisFile>,
    pub variables: Vec<VariableFile>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl DatasetFile {
    pub fn into_dataset(self) -> color_eyre::Result<Dataset> {
        let mut builder = DatasetBuilder::new(self.name);
        for axis in self.axes {
            builder = builder.axis(axis.name, axis.unit, axis.values);
        }
        for variable in self.variables {
            let dims: Vec<&str> = variable.dims.iter().map(String::as_str).collect();
            let values = variable
                .values
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            builder = builder.variable(variable.name, &dims, values);
        }
        for (key, value) in self.metadata {
            builder = builder.metadata(key, value);
        }
        Ok(builder.build()?)
    }
}

/// Parse a dataset document
pub fn parse_dataset(json: &str) -> color_eyre::Result<Dataset> {
    let file: DatasetFile = serde_json::from_str(json).wrap_err("parsing dataset JSON")?;
    file.into_dataset().wrap_err("invalid dataset")
}

/// Load a dataset file, naming the run after the file when the document has no name
pub fn load_dataset(path: &Path) -> color_eyre::Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading dataset {}", path.display()))?;
    let mut file: DatasetFile = serde_json::from_str(&content)
        .wrap_err_with(|| format!("parsing dataset {}", path.display()))?;
    if file.name.is_empty() {
        file.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    let dataset = file
        .into_dataset()
        .wrap_err_with(|| format!("invalid dataset {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        axes = dataset.ndim(),
        variables = dataset.variable_names().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RUN: &str = r#"{
        "name": "run 12",
        "axes": [
            {"name": "iteration", "values": [0, 1]},
            {"name": "freq", "unit": "Hz", "values": [5.0e9, 5.1e9, 5.2e9]}
        ],
        "variables": [
            {"name": "q1__state", "dims": ["iteration", "freq"], "values": [1, 2, 3, 4, null, 6]}
        ],
        "metadata": {"parallel_sweep_axes": "{'0': ['iteration'], '1': ['freq']}"}
    }"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = parse_dataset(RUN).unwrap();

        assert_eq!(dataset.name(), "run 12");
        assert_eq!(dataset.sizes(), vec![("iteration", 2), ("freq", 3)]);
        assert_eq!(dataset.coord("freq").unwrap().unit, "Hz");
        assert_eq!(dataset.coord("iteration").unwrap().unit, "");
        let values = dataset.variable("q1__state").unwrap().values();
        assert!(values[4].is_nan());
        assert_eq!(values[5], 6.0);
        assert!(dataset.metadata("parallel_sweep_axes").is_some());
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let json = r#"{
            "axes": [{"name": "freq", "values": [1, 2]}],
            "variables": [{"name": "v", "dims": ["freq"], "values": [1]}]
        }"#;
        let err = parse_dataset(json).unwrap_err();
        assert!(format!("{err:?}").contains("shape"));
    }

    #[test]
    fn test_load_names_run_after_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("spectroscopy.json");
        std::fs::write(
            &path,
            r#"{"axes": [{"name": "freq", "values": [1, 2]}],
                "variables": [{"name": "v", "dims": ["freq"], "values": [3, 4]}]}"#,
        )
        .unwrap();

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.name(), "spectroscopy");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_dataset(&temp_dir.path().join("missing.json")).is_err());
    }
}
