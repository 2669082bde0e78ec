use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),
    #[error("data io error: {0}")]
    Io(#[from] io::Error),
    #[error("yaml parse error in {file}: {source}")]
    Yaml {
        file: String,
        source: serde_yaml::Error,
    },
    #[error("json parse error in {file}: {source}")]
    Json {
        file: String,
        source: serde_json::Error,
    },
    #[error("key {key:?} not found in {file}")]
    MissingKey { file: String, key: String },
    #[error("key {key:?} in {file} is not an array")]
    NotAnArray { file: String, key: String },
}

#[derive(Clone, Copy)]
enum Format {
    Yaml,
    Json,
}

/// Loads YAML/JSON test-data files from one directory, with an in-memory
/// cache and `{placeholder}` substitution.
///
/// Placeholders come from the file itself: a top-level `test_suffix` string
/// fills `{suffix}`, and every string under a top-level `variables` map fills
/// `{<name>}`.
pub struct DataLoader {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Value>>,
}

impl DataLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DataLoader {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load a data file, dispatching on its extension. Results are cached
    /// per file name until `evict` is called.
    pub fn load(&self, name: &str) -> Result<Value, DataError> {
        let format = if name.ends_with(".json") {
            Format::Json
        } else {
            Format::Yaml
        };
        self.load_as(name, format)
    }

    /// Parse as YAML no matter what the file is called.
    pub fn load_yaml(&self, name: &str) -> Result<Value, DataError> {
        self.load_as(name, Format::Yaml)
    }

    /// Parse as JSON no matter what the file is called.
    pub fn load_json(&self, name: &str) -> Result<Value, DataError> {
        self.load_as(name, Format::Json)
    }

    fn load_as(&self, name: &str, format: Format) -> Result<Value, DataError> {
        if let Some(value) = self.cache.lock().unwrap().get(name) {
            debug!(name, "data file served from cache");
            return Ok(value.clone());
        }

        let path = self.dir.join(name);
        if !path.exists() {
            return Err(DataError::NotFound(path));
        }
        let text = fs::read_to_string(&path)?;

        let value: Value = match format {
            Format::Json => serde_json::from_str(&text).map_err(|source| DataError::Json {
                file: name.to_string(),
                source,
            })?,
            Format::Yaml => serde_yaml::from_str(&text).map_err(|source| DataError::Yaml {
                file: name.to_string(),
                source,
            })?,
        };
        let value = apply_placeholders(value);

        debug!(name, path = %path.display(), "data file loaded");
        self.cache
            .lock()
            .unwrap()
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Dotted-path lookup, e.g. `get("login.yaml", "credentials.username")`.
    pub fn get(&self, name: &str, key: &str) -> Result<Value, DataError> {
        let mut current = self.load(name)?;
        for part in key.split('.') {
            current = match current {
                Value::Object(mut map) => map.remove(part).ok_or_else(|| DataError::MissingKey {
                    file: name.to_string(),
                    key: key.to_string(),
                })?,
                _ => {
                    return Err(DataError::MissingKey {
                        file: name.to_string(),
                        key: key.to_string(),
                    });
                }
            };
        }
        Ok(current)
    }

    /// The array under `key`, one element per parametrized test case.
    pub fn cases(&self, name: &str, key: &str) -> Result<Vec<Value>, DataError> {
        match self.get(name, key)? {
            Value::Array(items) => Ok(items),
            _ => Err(DataError::NotAnArray {
                file: name.to_string(),
                key: key.to_string(),
            }),
        }
    }

    pub fn evict(&self, name: &str) {
        self.cache.lock().unwrap().remove(name);
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn apply_placeholders(value: Value) -> Value {
    let mut vars: HashMap<String, String> = HashMap::new();
    if let Value::Object(map) = &value {
        if let Some(Value::String(suffix)) = map.get("test_suffix") {
            vars.insert("suffix".to_string(), suffix.clone());
        }
        if let Some(Value::Object(declared)) = map.get("variables") {
            for (k, v) in declared {
                if let Value::String(v) = v {
                    vars.insert(k.clone(), v.clone());
                }
            }
        }
    }
    if vars.is_empty() {
        return value;
    }
    substitute(value, &vars)
}

fn substitute(value: Value, vars: &HashMap<String, String>) -> Value {
    match value {
        Value::String(mut s) => {
            for (name, replacement) in vars {
                let pattern = format!("{{{name}}}");
                if s.contains(&pattern) {
                    s = s.replace(&pattern, replacement);
                }
            }
            Value::String(s)
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| substitute(v, vars)).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, substitute(v, vars)))
                .collect(),
        ),
        other => other,
    }
}
