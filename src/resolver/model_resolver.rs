//! Model inheritance resolution.

use super::ResolvedModel;
use crate::error::{ExporterError, Result};
use crate::resource_pack::{AssetSource, RawModel};
use crate::types::strip_namespace;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Resolves model inheritance chains against an asset source.
pub struct ModelResolver<'a, S: AssetSource + ?Sized> {
    source: &'a S,
    /// Parent documents fetched so far, by normalised id.
    cache: RefCell<HashMap<String, RawModel>>,
}

impl<'a, S: AssetSource + ?Sized> ModelResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a model that is already in hand (e.g. from a file picker).
    pub fn resolve(&self, model: &RawModel) -> Result<ResolvedModel> {
        self.resolve_chain(model.clone(), Vec::new())
    }

    /// Fetch a model by path and resolve it.
    pub fn resolve_path(&self, model_path: &str) -> Result<ResolvedModel> {
        let path = strip_namespace(model_path);
        let model = self.source.model(path)?;
        self.resolve_chain(model, vec![path.to_string()])
    }

    /// Walk the parent chain iteratively, then fold it from the root down.
    ///
    /// `seen` holds the ids already on the chain; meeting one again is a cycle.
    fn resolve_chain(&self, model: RawModel, mut seen: Vec<String>) -> Result<ResolvedModel> {
        let mut visited: HashSet<String> = seen.iter().cloned().collect();
        let mut parents = Vec::new();
        let mut chain = vec![model];

        loop {
            let parent_id = match chain.last().and_then(|m| m.parent_path()) {
                Some(parent) => parent.to_string(),
                None => break,
            };

            // Builtin parents (builtin/generated, builtin/entity) have no document.
            if parent_id.starts_with("builtin/") {
                tracing::debug!("Stopping at builtin parent {}", parent_id);
                break;
            }

            seen.push(parent_id.clone());
            if !visited.insert(parent_id.clone()) {
                return Err(ExporterError::CyclicReference(seen));
            }

            match self.fetch(&parent_id) {
                Ok(parent) => {
                    parents.push(parent_id);
                    chain.push(parent);
                }
                Err(e) => {
                    tracing::warn!("Failed to load parent model {}: {}", parent_id, e);
                    break;
                }
            }
        }

        let mut models = chain.into_iter().rev();
        let mut resolved = match models.next() {
            Some(root) => ResolvedModel::from(root),
            None => ResolvedModel::default(),
        };
        for child in models {
            resolved = ResolvedModel::merge(&child, resolved);
        }
        resolved.parents = parents;

        Ok(resolved)
    }

    fn fetch(&self, model_path: &str) -> Result<RawModel> {
        if let Some(cached) = self.cache.borrow().get(model_path) {
            return Ok(cached.clone());
        }

        let model = self.source.model(model_path)?;
        self.cache
            .borrow_mut()
            .insert(model_path.to_string(), model.clone());
        Ok(model)
    }
}
