use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML file (by extension) into a typed struct.
pub fn read_document<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    log::debug!("reading {} as {}", canonical.display(), if is_yaml { "YAML" } else { "JSON" });

    let value: T = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(value)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Flows {
        cash_flows: Vec<String>,
    }

    fn write_temp(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("uw-{}-{}", std::process::id(), name));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_yaml_by_extension() {
        let path = write_temp("flows.yaml", "cash_flows:\n  - \"-100\"\n  - \"110\"\n");
        let doc: Flows = read_document(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.cash_flows, vec!["-100", "110"]);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_json_otherwise() {
        let path = write_temp("flows.json", r#"{"cash_flows": ["-100", "110"]}"#);
        let doc: Flows = read_document(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.cash_flows.len(), 2);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        assert!(read_document::<Flows>("/nonexistent/deal.json").is_err());
    }
}
