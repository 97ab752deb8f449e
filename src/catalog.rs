use crate::engine::RenderEngine;

/// Ordered scene list, fetched once from the engine and read-only afterwards.
///
/// Used to populate the scene selector and to validate that a requested scene
/// name is known before a render is dispatched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneCatalog {
    names: Vec<String>,
}

impl SceneCatalog {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn from_engine(engine: &dyn RenderEngine) -> Self {
        Self::new(engine.list_scenes())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
