//! Watched categories and category sets

use serde::{Deserialize, Serialize};

/// A layer of the application whose calls are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Web-facing request handlers
    Controller,
    /// Service objects holding business logic
    Service,
    /// General-purpose components
    Component,
    /// Configuration holders
    #[serde(alias = "config")]
    Configuration,
}

impl Category {
    /// Every watched category
    pub const ALL: [Category; 4] = [
        Category::Controller,
        Category::Service,
        Category::Component,
        Category::Configuration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Controller => "controller",
            Category::Service => "service",
            Category::Component => "component",
            Category::Configuration => "configuration",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Category::Controller => 1,
            Category::Service => 1 << 1,
            Category::Component => 1 << 2,
            Category::Configuration => 1 << 3,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of categories a type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategorySet {
    bits: u8,
}

impl CategorySet {
    /// The empty set
    pub const EMPTY: CategorySet = CategorySet { bits: 0 };

    pub const CONTROLLER: CategorySet = CategorySet::single(Category::Controller);
    pub const SERVICE: CategorySet = CategorySet::single(Category::Service);
    pub const COMPONENT: CategorySet = CategorySet::single(Category::Component);
    pub const CONFIGURATION: CategorySet = CategorySet::single(Category::Configuration);

    /// A set holding exactly one category
    pub const fn single(category: Category) -> Self {
        Self { bits: category.bit() }
    }

    /// Add a category, returning the extended set
    pub const fn with(self, category: Category) -> Self {
        Self {
            bits: self.bits | category.bit(),
        }
    }

    /// Union of two sets
    pub const fn union(self, other: CategorySet) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.bits & category.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Categories in this set, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl From<Category> for CategorySet {
    fn from(category: Category) -> Self {
        Self::single(category)
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, CategorySet::with)
    }
}

impl std::ops::BitOr for CategorySet {
    type Output = CategorySet;

    fn bitor(self, rhs: CategorySet) -> CategorySet {
        self.union(rhs)
    }
}

impl std::ops::BitOr<Category> for CategorySet {
    type Output = CategorySet;

    fn bitor(self, rhs: Category) -> CategorySet {
        self.with(rhs)
    }
}
