//! Element identifiers and the per-kind coercion policy

use crate::error::IdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use trav_core::Value;
use uuid::Uuid;

/// 2^63, the first double past `i64::MAX`
const LONG_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Canonical identifier of a stored element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    /// 64-bit integer
    Long(i64),
    /// Unsigned 32-bit integer
    Integer(u32),
    /// UUID
    Uuid(Uuid),
    /// Opaque string, only under [`IdManager::Any`]
    String(String),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(l) => write!(f, "{l}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<ElementId> for Value {
    fn from(id: ElementId) -> Self {
        match id {
            ElementId::Long(l) => Value::Long(l),
            ElementId::Integer(i) => Value::Long(i64::from(i)),
            ElementId::Uuid(u) => Value::Uuid(u),
            ElementId::String(s) => Value::String(s),
        }
    }
}

/// How supplied identifiers are coerced, and how missing ones are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdManager {
    /// Longs, strings and UUIDs kept as given; ints widen to longs
    #[default]
    Any,
    /// Everything numeric or numeric-looking becomes a 64-bit integer
    Long,
    /// Everything numeric or numeric-looking becomes an unsigned 32-bit integer
    Integer,
    /// UUIDs and their string form become UUIDs
    Uuid,
}

impl fmt::Display for IdManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Long => "long",
            Self::Integer => "integer",
            Self::Uuid => "uuid",
        })
    }
}

impl IdManager {
    /// Coerce a supplied identifier
    ///
    /// # Errors
    /// [`IdError::Unsupported`] for a kind the policy never takes,
    /// [`IdError::Malformed`] for a value that does not convert.
    pub fn convert(self, value: &Value) -> Result<ElementId, IdError> {
        match self {
            Self::Any => match value {
                Value::Int(i) => Ok(ElementId::Long(i64::from(*i))),
                Value::Long(l) => Ok(ElementId::Long(*l)),
                Value::Uuid(u) => Ok(ElementId::Uuid(*u)),
                Value::String(s) => Ok(ElementId::String(s.clone())),
                other => Err(self.unsupported(other)),
            },
            Self::Long => self.to_long(value).map(ElementId::Long),
            Self::Integer => {
                let long = match value {
                    Value::String(s) => {
                        return s
                            .parse::<u32>()
                            .map(ElementId::Integer)
                            .map_err(|e| self.malformed(value, e));
                    }
                    other => self.to_long(other)?,
                };
                u32::try_from(long)
                    .map(ElementId::Integer)
                    .map_err(|e| self.malformed(value, e))
            }
            Self::Uuid => match value {
                Value::Uuid(u) => Ok(ElementId::Uuid(*u)),
                Value::String(s) => Uuid::parse_str(s)
                    .map(ElementId::Uuid)
                    .map_err(|e| self.malformed(value, e)),
                other => Err(self.unsupported(other)),
            },
        }
    }

    /// Whether the kind of `value` is one this policy takes
    ///
    /// A `true` does not guarantee [`IdManager::convert`] succeeds; `"abc"`
    /// is allowed under [`IdManager::Long`] but does not parse.
    #[must_use]
    pub fn allow(self, value: &Value) -> bool {
        match self {
            Self::Any => matches!(
                value,
                Value::Int(_) | Value::Long(_) | Value::String(_) | Value::Uuid(_)
            ),
            Self::Long | Self::Integer => matches!(
                value,
                Value::Int(_)
                    | Value::Long(_)
                    | Value::Float(_)
                    | Value::Double(_)
                    | Value::String(_)
            ),
            Self::Uuid => matches!(value, Value::Uuid(_) | Value::String(_)),
        }
    }

    /// Generate an identifier, drawing numeric ones from `sequence`
    ///
    /// # Errors
    /// [`IdError::Exhausted`] once the sequence leaves the policy's range.
    pub fn next_id(self, sequence: &AtomicU64) -> Result<ElementId, IdError> {
        let exhausted = |_| IdError::Exhausted { manager: self };
        match self {
            Self::Uuid => Ok(ElementId::Uuid(Uuid::new_v4())),
            Self::Integer => u32::try_from(sequence.fetch_add(1, Ordering::Relaxed))
                .map(ElementId::Integer)
                .map_err(exhausted),
            Self::Any | Self::Long => i64::try_from(sequence.fetch_add(1, Ordering::Relaxed))
                .map(ElementId::Long)
                .map_err(exhausted),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn to_long(self, value: &Value) -> Result<i64, IdError> {
        let double = match value {
            Value::Int(i) => return Ok(i64::from(*i)),
            Value::Long(l) => return Ok(*l),
            Value::String(s) => {
                return s.parse::<i64>().map_err(|e| self.malformed(value, e));
            }
            Value::Float(x) => f64::from(*x),
            Value::Double(x) => *x,
            other => return Err(self.unsupported(other)),
        };
        if double.fract() != 0.0 || !(-LONG_LIMIT..LONG_LIMIT).contains(&double) {
            return Err(self.malformed(value, "not an integral value in range"));
        }
        Ok(double as i64)
    }

    fn unsupported(self, value: &Value) -> IdError {
        IdError::Unsupported {
            manager: self,
            found: value.kind(),
        }
    }

    fn malformed(self, value: &Value, reason: impl fmt::Display) -> IdError {
        IdError::Malformed {
            manager: self,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn long_accepts_every_numeric_form() {
        for value in [
            Value::Int(100),
            Value::Long(100),
            Value::Float(100.0),
            Value::Double(100.0),
            Value::from("100"),
        ] {
            assert_eq!(IdManager::Long.convert(&value), Ok(ElementId::Long(100)), "{value}");
        }
    }

    #[test]
    fn long_rejects_fractions_and_garbage() {
        assert!(matches!(
            IdManager::Long.convert(&Value::Double(1.5)),
            Err(IdError::Malformed { .. })
        ));
        assert!(matches!(
            IdManager::Long.convert(&Value::Double(f64::NAN)),
            Err(IdError::Malformed { .. })
        ));
        assert!(matches!(
            IdManager::Long.convert(&Value::from("ten")),
            Err(IdError::Malformed { .. })
        ));
        assert!(matches!(
            IdManager::Long.convert(&Value::Bool(true)),
            Err(IdError::Unsupported { .. })
        ));
    }

    #[test]
    fn integer_is_unsigned() {
        assert_eq!(
            IdManager::Integer.convert(&Value::Double(300.0)),
            Ok(ElementId::Integer(300))
        );
        assert!(IdManager::Integer.convert(&Value::Long(-1)).is_err());
        assert!(IdManager::Integer.convert(&Value::from("-1")).is_err());
        assert!(IdManager::Integer.convert(&Value::Long(i64::from(u32::MAX) + 1)).is_err());
    }

    #[test]
    fn uuid_accepts_string_form() {
        let id = Uuid::new_v4();
        assert_eq!(
            IdManager::Uuid.convert(&Value::from(id.to_string())),
            Ok(ElementId::Uuid(id))
        );
        assert_eq!(IdManager::Uuid.convert(&Value::Uuid(id)), Ok(ElementId::Uuid(id)));
        assert!(IdManager::Uuid.convert(&Value::Long(1)).is_err());
    }

    #[test]
    fn any_keeps_values_as_given() {
        assert_eq!(
            IdManager::Any.convert(&Value::from("100")),
            Ok(ElementId::String("100".into()))
        );
        assert_eq!(IdManager::Any.convert(&Value::Int(7)), Ok(ElementId::Long(7)));
        assert!(!IdManager::Any.allow(&Value::Double(1.0)));
    }

    #[test]
    fn allow_is_a_kind_check() {
        assert!(IdManager::Long.allow(&Value::from("abc")));
        assert!(!IdManager::Long.allow(&Value::Null));
        assert!(!IdManager::Uuid.allow(&Value::Long(1)));
    }

    #[test]
    fn generated_ids_follow_the_policy() {
        let sequence = AtomicU64::new(0);
        assert_eq!(IdManager::Long.next_id(&sequence), Ok(ElementId::Long(0)));
        assert_eq!(IdManager::Integer.next_id(&sequence), Ok(ElementId::Integer(1)));
        assert!(matches!(IdManager::Uuid.next_id(&sequence), Ok(ElementId::Uuid(_))));

        let sequence = AtomicU64::new(u64::from(u32::MAX) + 1);
        assert_eq!(
            IdManager::Integer.next_id(&sequence),
            Err(IdError::Exhausted {
                manager: IdManager::Integer
            })
        );
    }
}
