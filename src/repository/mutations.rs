//! Pure collection transformations behind every page action.
//!
//! Each function returns a new collection and leaves its input alone.
//! Records that are not touched are shared with the input (`Arc::ptr_eq`
//! holds for them). An id that is not in the collection is a no-op.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::record::{unknown_field, Collection, FieldValue, Record, RecordId};
use crate::services::error_handling::DeskError;

use super::id_allocator::IdAllocator;

fn position<R: Record>(collection: &[Arc<R>], id: &RecordId) -> Option<usize> {
    collection.iter().position(|r| r.id() == id)
}

fn replace_at<R: Record>(collection: &[Arc<R>], index: usize, record: R) -> Collection<R> {
    let mut next = collection.to_vec();
    next[index] = Arc::new(record);
    next
}

/// Inverts boolean `field` on the record with `id`.
pub fn toggle_flag<R: Record>(
    collection: &[Arc<R>],
    id: &RecordId,
    field: &str,
) -> Result<Collection<R>, DeskError> {
    let Some(index) = position(collection, id) else {
        return Ok(collection.to_vec());
    };

    let current = collection[index]
        .field(field)
        .ok_or_else(|| unknown_field(R::KIND, field))?;
    let flag = current.as_flag().ok_or_else(|| DeskError::FieldTypeMismatch {
        field: field.to_string(),
        expected: "flag",
    })?;

    let mut updated = R::clone(&collection[index]);
    updated.set_field(field, FieldValue::Flag(!flag))?;
    Ok(replace_at(collection, index, updated))
}

/// Drops the record with `id`. Removing an absent id returns an equal collection.
pub fn remove<R: Record>(collection: &[Arc<R>], id: &RecordId) -> Collection<R> {
    collection.iter().filter(|r| r.id() != id).cloned().collect()
}

/// Appends `defaults` under a freshly minted id.
pub fn add<R: Record>(
    collection: &[Arc<R>],
    defaults: R,
    ids: &mut IdAllocator,
) -> (Collection<R>, RecordId) {
    let id = ids.allocate(collection);
    let mut next = collection.to_vec();
    next.push(Arc::new(defaults.with_id(id.clone())));
    (next, id)
}

/// Changes a single field of the record with `id`.
pub fn update_field<R: Record>(
    collection: &[Arc<R>],
    id: &RecordId,
    field: &str,
    value: FieldValue,
) -> Result<Collection<R>, DeskError> {
    let Some(index) = position(collection, id) else {
        return Ok(collection.to_vec());
    };

    let mut updated = R::clone(&collection[index]);
    updated.set_field(field, value)?;
    Ok(replace_at(collection, index, updated))
}

/// Fails on the first id that appears twice, or on an empty id.
pub fn validate_unique_ids<R: Record>(collection: &[Arc<R>]) -> Result<(), DeskError> {
    let mut seen = HashSet::with_capacity(collection.len());
    for record in collection {
        if record.id().as_str().is_empty() {
            return Err(DeskError::InvalidRecord {
                reason: format!("{} without an id", R::KIND),
            });
        }
        if !seen.insert(record.id()) {
            return Err(DeskError::DuplicateId {
                id: record.id().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class_session::{fields, ClassSession};
    use crate::domain::record::collect;

    fn classes() -> Collection<ClassSession> {
        collect(vec![
            ClassSession::new("1", "HIIT com Pesos", "08:00", "Carla", "45 min", "Avançado", "Força"),
            ClassSession::new("2", "Yoga Flow", "10:30", "Paulo", "60 min", "Intermediário", "Flexibilidade"),
            ClassSession::new("3", "Spinning Express", "17:45", "Amanda", "30 min", "Todos", "Cardio").completed(),
        ])
    }

    #[test]
    fn test_toggle_shares_untouched_records() {
        let before = classes();
        let after = toggle_flag(&before, &RecordId::from("2"), fields::COMPLETED).unwrap();

        assert!(after[1].completed);
        assert!(!before[1].completed);
        assert!(Arc::ptr_eq(&before[0], &after[0]));
        assert!(Arc::ptr_eq(&before[2], &after[2]));
        assert!(!Arc::ptr_eq(&before[1], &after[1]));
    }

    #[test]
    fn test_toggle_rejects_non_flag_field() {
        let err = toggle_flag(&classes(), &RecordId::from("1"), fields::NAME).unwrap_err();
        assert!(matches!(err, DeskError::FieldTypeMismatch { .. }));

        let err = toggle_flag(&classes(), &RecordId::from("1"), "sala").unwrap_err();
        assert!(matches!(err, DeskError::UnknownField { .. }));
    }

    #[test]
    fn test_missing_id_is_noop() {
        let before = classes();
        let toggled = toggle_flag(&before, &RecordId::from("99"), fields::COMPLETED).unwrap();
        let updated = update_field(&before, &RecordId::from("99"), fields::NAME, FieldValue::text("x")).unwrap();
        let removed = remove(&before, &RecordId::from("99"));

        for after in [toggled, updated, removed] {
            assert_eq!(after.len(), before.len());
            assert!(after.iter().zip(&before).all(|(a, b)| Arc::ptr_eq(a, b)));
        }
    }

    #[test]
    fn test_update_field_only_changes_target() {
        let before = classes();
        let after = update_field(&before, &RecordId::from("3"), fields::INSTRUCTOR, FieldValue::text("Mariana")).unwrap();

        assert_eq!(after[2].instructor, "Mariana");
        assert_eq!(after[2].name, "Spinning Express");
        assert!(after[2].completed);
        assert_eq!(after[2].id, before[2].id);
    }

    #[test]
    fn test_validate_unique_ids() {
        let mut collection = classes();
        assert!(validate_unique_ids(&collection).is_ok());

        collection.push(collection[0].clone());
        assert_eq!(
            validate_unique_ids(&collection).unwrap_err(),
            DeskError::DuplicateId { id: "1".to_string() }
        );
    }
}
