//! dm-project: DAG definition file format and loading.

pub mod schema;

use std::path::Path;

pub use schema::*;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<DagDef> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<DagDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, dag: &DagDef) -> ProjectResult<()> {
    let content = serde_yaml::to_string(dag)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<DagDef> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_json(path: &Path, dag: &DagDef) -> ProjectResult<()> {
    let content = serde_json::to_string_pretty(dag)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` is read as JSON, anything else as YAML.
pub fn load(path: &Path) -> ProjectResult<DagDef> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_json(path)
    } else {
        load_yaml(path)
    }
}
