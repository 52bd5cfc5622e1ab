//! Model persistence keyed by model id.

use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChessError, Result};
use crate::policy::strategy::is_reserved_id;
use crate::policy::PolicyModel;

pub const DEFAULT_MODEL_ID: &str = "default";

/// Key-value store of models.
pub trait ModelStore {
    fn put(&mut self, model: &PolicyModel) -> Result<()>;
    fn get_all(&self) -> Result<Vec<PolicyModel>>;
    fn delete(&mut self, id: &str) -> Result<()>;

    fn is_persistent(&self) -> bool { true }
}

/// Model ids double as file names, so they are kept to a safe alphabet.
pub fn validate_id(id: &str) -> Result<()> {
    if is_reserved_id(id) {
        return Err(ChessError::ReservedModelId(id.to_string()));
    }
    let ok = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(ChessError::InvalidModelId(id.to_string()));
    }
    Ok(())
}

/// One `<id>.json` file per model.
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, id: &str) -> PathBuf { self.dir.join(format!("{id}.json")) }

    fn read_one(path: &Path) -> Result<PolicyModel> {
        let text = fs::read_to_string(path)?;
        let model: PolicyModel = serde_json::from_str(&text)?;
        validate_id(&model.id)?;
        if path.file_stem().and_then(|s| s.to_str()) != Some(model.id.as_str()) {
            return Err(ChessError::CorruptModel(format!("file name does not match id {:?}", model.id)));
        }
        model.validate()?;
        Ok(model)
    }
}

impl ModelStore for JsonDirStore {
    fn put(&mut self, model: &PolicyModel) -> Result<()> {
        validate_id(&model.id)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", model.id));
        fs::write(&tmp, serde_json::to_string(model)?)?;
        fs::rename(&tmp, self.path_for(&model.id))?;
        Ok(())
    }

    /// Unreadable or invalid files are skipped with a warning.
    fn get_all(&self) -> Result<Vec<PolicyModel>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_one(&path) {
                Ok(m) => out.push(m),
                Err(e) => warn!("discarding stored model {}: {}", path.display(), e),
            }
        }
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        validate_id(id)?;
        let path = self.path_for(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Non-persistent store; also the fallback when the directory store is unavailable.
#[derive(Default)]
pub struct MemoryStore {
    models: BTreeMap<String, PolicyModel>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl ModelStore for MemoryStore {
    fn put(&mut self, model: &PolicyModel) -> Result<()> {
        validate_id(&model.id)?;
        self.models.insert(model.id.clone(), model.clone());
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<PolicyModel>> {
        let mut out: Vec<_> = self.models.values().filter(|m| m.validate().is_ok()).cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.models.remove(id);
        Ok(())
    }

    fn is_persistent(&self) -> bool { false }
}

/// Opens a directory store, falling back to memory if it cannot be created.
pub fn open_store(dir: Option<&Path>) -> Box<dyn ModelStore> {
    match dir {
        Some(d) => match JsonDirStore::open(d) {
            Ok(s) => {
                info!("model store at {}", d.display());
                Box::new(s)
            }
            Err(e) => {
                warn!("model store {} unavailable ({}), models will not be saved", d.display(), e);
                Box::new(MemoryStore::new())
            }
        },
        None => Box::new(MemoryStore::new()),
    }
}

/// Loads every valid model; synthesizes a zero-weight model when none remain.
pub fn load_models(store: &dyn ModelStore) -> Vec<PolicyModel> {
    let mut models = match store.get_all() {
        Ok(m) => m,
        Err(e) => {
            warn!("could not read model store: {}", e);
            Vec::new()
        }
    };
    if models.is_empty() {
        info!("no stored models, starting from a fresh zero-weight model");
        models.push(PolicyModel::new(DEFAULT_MODEL_ID, "Default model"));
    }
    models
}
