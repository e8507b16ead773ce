use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Lifecycle state of an entity within one unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
    Unchanged,
    Detached,
}

impl EntityState {
    /// States that still need to be written when the unit of work commits
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            EntityState::Added | EntityState::Modified | EntityState::Deleted
        )
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::Added => write!(f, "ADDED"),
            EntityState::Modified => write!(f, "MODIFIED"),
            EntityState::Deleted => write!(f, "DELETED"),
            EntityState::Unchanged => write!(f, "UNCHANGED"),
            EntityState::Detached => write!(f, "DETACHED"),
        }
    }
}

/// Which side of the commit a dispatch runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookStage {
    /// Before changes are persisted
    PreSave,
    /// After changes were persisted
    PostSave,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::PreSave => write!(f, "pre_save"),
            HookStage::PostSave => write!(f, "post_save"),
        }
    }
}

/// Declared priority of a hook.
///
/// Long-running or bulk operations raise the floor to skip hooks that are
/// nice to have but not required for data consistency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HookImportance {
    /// Skipped whenever the caller asks for anything above the default floor
    #[default]
    Normal,
    /// Runs during bulk operations unless the caller demands essential hooks only
    Important,
    /// Always runs
    Essential,
}

impl fmt::Display for HookImportance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookImportance::Normal => write!(f, "normal"),
            HookImportance::Important => write!(f, "important"),
            HookImportance::Essential => write!(f, "essential"),
        }
    }
}

/// Runtime type descriptor for entities and unit-of-work implementations.
///
/// `bases` lists every base type or capability the type is assignable to.
/// Two descriptors are equal when their names are equal.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    name: &'static str,
    bases: &'static [&'static str],
}

impl TypeInfo {
    pub const fn new(name: &'static str) -> Self {
        Self { name, bases: &[] }
    }

    pub const fn with_bases(name: &'static str, bases: &'static [&'static str]) -> Self {
        Self { name, bases }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bases(&self) -> &'static [&'static str] {
        self.bases
    }

    /// True when this type is `name` or derives from it
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.bases.contains(&name)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Matches a [`TypeInfo`] by assignability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeFilter {
    #[default]
    Any,
    Named(&'static str),
}

impl TypeFilter {
    pub fn matches(&self, ty: &TypeInfo) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Named(name) => ty.is_a(name),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::Any => write!(f, "*"),
            TypeFilter::Named(name) => f.write_str(name),
        }
    }
}
