//! Shape checks run before every write.
//!
//! Each `validate_*` function turns a raw JSON payload into the typed record
//! the store accepts, or reports the first field that is missing or
//! malformed. Unknown fields are ignored.

use crate::model::{EntityKind, NewCourse, NewResult, NewStudent};
use crate::store::Store;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind} validation failed: request body must be a JSON object")]
    NotAnObject { kind: EntityKind },

    #[error("{kind} validation failed: `{field}` {reason}")]
    Field {
        kind: EntityKind,
        field: &'static str,
        reason: &'static str,
    },

    #[error("{kind} validation failed: `{field}` references unknown {target} {id}")]
    UnknownReference {
        kind: EntityKind,
        field: &'static str,
        target: EntityKind,
        id: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> EntityKind {
        match self {
            ValidationError::NotAnObject { kind }
            | ValidationError::Field { kind, .. }
            | ValidationError::UnknownReference { kind, .. } => *kind,
        }
    }
}

/// Existence lookups used when references are checked strictly.
pub trait ReferenceLookup {
    fn student_exists(&self, id: &str) -> anyhow::Result<bool>;
    fn course_exists(&self, id: &str) -> anyhow::Result<bool>;
}

impl ReferenceLookup for Store {
    fn student_exists(&self, id: &str) -> anyhow::Result<bool> {
        Store::student_exists(self, id)
    }

    fn course_exists(&self, id: &str) -> anyhow::Result<bool> {
        Store::course_exists(self, id)
    }
}

pub fn validate_student(payload: &Value) -> Result<NewStudent, ValidationError> {
    let kind = EntityKind::Student;
    let obj = as_object(kind, payload)?;
    let first_name = required_str(kind, obj, "firstName", &[])?;
    let family_name = required_str(kind, obj, "familyName", &[])?;
    let date_of_birth = required_date(kind, obj, "dateOfBirth")?;
    Ok(NewStudent {
        first_name,
        family_name,
        date_of_birth,
    })
}

pub fn validate_course(payload: &Value) -> Result<NewCourse, ValidationError> {
    let kind = EntityKind::Course;
    let obj = as_object(kind, payload)?;
    let course_name = required_str(kind, obj, "courseName", &[])?;
    Ok(NewCourse { course_name })
}

/// `studentName`/`courseName` are accepted as aliases for the references;
/// older clients send identifiers under those keys.
pub fn validate_result(payload: &Value) -> Result<NewResult, ValidationError> {
    let kind = EntityKind::Result;
    let obj = as_object(kind, payload)?;
    let student_ref = required_ref(kind, obj, "studentRef", &["studentName"])?;
    let course_ref = required_ref(kind, obj, "courseRef", &["courseName"])?;
    let score = required_str(kind, obj, "score", &[])?;
    Ok(NewResult {
        student_ref,
        course_ref,
        score,
    })
}

/// Returns the first reference of `new` that does not resolve, if any.
pub fn check_references<L: ReferenceLookup + ?Sized>(
    refs: &L,
    new: &NewResult,
) -> anyhow::Result<Option<ValidationError>> {
    if !refs.student_exists(&new.student_ref)? {
        return Ok(Some(ValidationError::UnknownReference {
            kind: EntityKind::Result,
            field: "studentRef",
            target: EntityKind::Student,
            id: new.student_ref.clone(),
        }));
    }
    if !refs.course_exists(&new.course_ref)? {
        return Ok(Some(ValidationError::UnknownReference {
            kind: EntityKind::Result,
            field: "courseRef",
            target: EntityKind::Course,
            id: new.course_ref.clone(),
        }));
    }
    Ok(None)
}

fn as_object(kind: EntityKind, payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload
        .as_object()
        .ok_or(ValidationError::NotAnObject { kind })
}

fn lookup<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    aliases: &[&str],
) -> Option<&'a Value> {
    std::iter::once(field)
        .chain(aliases.iter().copied())
        .filter_map(|k| obj.get(k))
        .find(|v| !v.is_null())
}

fn required_str(
    kind: EntityKind,
    obj: &Map<String, Value>,
    field: &'static str,
    aliases: &[&str],
) -> Result<String, ValidationError> {
    let fail = |reason| ValidationError::Field {
        kind,
        field,
        reason,
    };
    match lookup(obj, field, aliases) {
        None => Err(fail("is required")),
        Some(Value::String(s)) => {
            let t = s.trim();
            if t.is_empty() {
                Err(fail("is required"))
            } else {
                Ok(t.to_string())
            }
        }
        Some(_) => Err(fail("must be a string")),
    }
}

fn required_ref(
    kind: EntityKind,
    obj: &Map<String, Value>,
    field: &'static str,
    aliases: &[&str],
) -> Result<String, ValidationError> {
    let raw = required_str(kind, obj, field, aliases)?;
    match Uuid::parse_str(&raw) {
        Ok(id) => Ok(id.to_string()),
        Err(_) => Err(ValidationError::Field {
            kind,
            field,
            reason: "is not a valid identifier",
        }),
    }
}

fn required_date(
    kind: EntityKind,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    let fail = |reason| ValidationError::Field {
        kind,
        field,
        reason,
    };
    match lookup(obj, field, &[]) {
        None => Err(fail("is required")),
        Some(Value::String(s)) => {
            let t = s.trim();
            if t.is_empty() {
                return Err(fail("is required"));
            }
            parse_date(t).ok_or(fail("is not a valid date"))
        }
        // Milliseconds since the Unix epoch, as a JavaScript Date serializes numerically.
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .ok_or(fail("is not a valid date")),
        Some(_) => Err(fail("is not a valid date")),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}
