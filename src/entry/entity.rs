// ============================================================================
// Entity Contracts
// ============================================================================

use crate::core::TypeInfo;
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// One component of an entity's persisted identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Int(i64),
    Text(String),
    Uuid(Uuid),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Int(v) => write!(f, "{}", v),
            KeyPart::Text(v) => f.write_str(v),
            KeyPart::Uuid(v) => write!(f, "{}", v),
        }
    }
}

/// Stable identity of a persisted entity.
///
/// Composite keys are folded into an ordered list of parts, in the order the
/// persistence layer declares the key columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey(Vec<KeyPart>);

impl EntityKey {
    pub fn int(id: i64) -> Self {
        Self(vec![KeyPart::Int(id)])
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self(vec![KeyPart::Text(id.into())])
    }

    pub fn uuid(id: Uuid) -> Self {
        Self(vec![KeyPart::Uuid(id)])
    }

    pub fn composite(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl From<i64> for EntityKey {
    fn from(id: i64) -> Self {
        Self::int(id)
    }
}

impl From<Uuid> for EntityKey {
    fn from(id: Uuid) -> Self {
        Self::uuid(id)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Host entity participating in a unit of work.
pub trait Entity: Send + Sync + fmt::Debug + 'static {
    /// Runtime type of the entity
    fn entity_type(&self) -> TypeInfo;

    /// Persisted identity; `None` while the entity is transient
    fn key(&self) -> Option<EntityKey>;

    /// Name of the boolean soft-delete flag, for entities that support soft deletion
    fn soft_delete_field(&self) -> Option<&'static str> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}
