//! Decides whether a call's target type is watched

use std::sync::Arc;

use super::registry::CategoryRegistry;
use crate::types::{Category, TargetType};

/// Read-only lookup against a frozen [`CategoryRegistry`]
#[derive(Debug, Clone, Default)]
pub struct CategoryMatcher {
    registry: Arc<CategoryRegistry>,
}

impl CategoryMatcher {
    pub fn new(registry: CategoryRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// True if the target belongs to at least one watched category
    pub fn is_watched(&self, target: &TargetType) -> bool {
        let Some(set) = self.registry.categories_of(target) else {
            return false;
        };
        Category::ALL
            .iter()
            .fold(false, |watched, category| watched | set.contains(*category))
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }
}

impl From<CategoryRegistry> for CategoryMatcher {
    fn from(registry: CategoryRegistry) -> Self {
        Self::new(registry)
    }
}
