//! Registration table mapping types to the categories they belong to

use std::collections::HashMap;

use crate::types::{Category, CategorySet, TargetType};

/// Static capability tag for a type whose calls are logged
///
/// # Example
///
/// ```
/// use calllog_core::category::{CategoryRegistry, Watched};
/// use calllog_core::types::{CategorySet, TargetType};
///
/// struct CheckoutController;
///
/// impl Watched for CheckoutController {
///     const CATEGORIES: CategorySet = CategorySet::CONTROLLER;
/// }
///
/// let mut registry = CategoryRegistry::new();
/// registry.register_watched::<CheckoutController>();
/// assert!(registry.categories_of(&TargetType::of::<CheckoutController>()).is_some());
/// ```
pub trait Watched {
    /// Categories this type belongs to
    const CATEGORIES: CategorySet;
}

/// Types known to belong to one or more watched categories
///
/// Filled at startup, then handed to a [`CategoryMatcher`](super::CategoryMatcher)
/// which only reads it.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    entries: HashMap<String, CategorySet>,
}

impl CategoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register type `T` under the given categories
    pub fn register<T: ?Sized>(&mut self, categories: impl Into<CategorySet>) -> &mut Self {
        self.register_target(&TargetType::of::<T>(), categories)
    }

    /// Register a type that carries its categories as a [`Watched`] tag
    pub fn register_watched<T: Watched + ?Sized>(&mut self) -> &mut Self {
        self.register::<T>(T::CATEGORIES)
    }

    /// Register a type by its fully-qualified name
    pub fn register_name(
        &mut self,
        type_name: impl Into<String>,
        categories: impl Into<CategorySet>,
    ) -> &mut Self {
        let categories = categories.into();
        let entry = self.entries.entry(type_name.into()).or_default();
        *entry = entry.union(categories);
        self
    }

    /// Register a target under the given categories
    ///
    /// Registering the same target again adds to its existing categories.
    pub fn register_target(
        &mut self,
        target: &TargetType,
        categories: impl Into<CategorySet>,
    ) -> &mut Self {
        self.register_name(target.name(), categories)
    }

    /// Categories registered for a target, if any
    pub fn categories_of(&self, target: &TargetType) -> Option<CategorySet> {
        self.entries.get(target.name()).copied()
    }

    /// Whether the target was registered as belonging to `category`
    pub fn is_member(&self, target: &TargetType, category: Category) -> bool {
        self.categories_of(target)
            .map(|set| set.contains(category))
            .unwrap_or(false)
    }

    /// Registered type names with their categories
    pub fn iter(&self) -> impl Iterator<Item = (&str, CategorySet)> + '_ {
        self.entries.iter().map(|(name, set)| (name.as_str(), *set))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
