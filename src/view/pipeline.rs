use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::domain::record::{Collection, FieldValue, Record};

use super::collate::{contains_lowercase, date_sort_key, locale_cmp};
use super::controls::{is_all_filter, SortDirection, ViewControls};
use super::list_spec::{FilterRule, ListSpec, SortKind};

/// Computes the visible rows: search, then filter, then sort.
///
/// Pure in all of its inputs. The source collection is never touched and the
/// returned rows share the (immutable) records with it.
pub fn derive_view<R: Record>(
    collection: &[Arc<R>],
    spec: &ListSpec<R>,
    controls: &ViewControls,
) -> Collection<R> {
    let query = controls.search.to_lowercase();

    let mut rows: Collection<R> = collection
        .iter()
        .filter(|record| matches_search(record.as_ref(), spec, &query))
        .filter(|record| matches_filter(record.as_ref(), spec, &controls.filter))
        .cloned()
        .collect();

    if let Some(column) = controls.sort_column.as_deref() {
        match spec.sort_kind(column) {
            Some(kind) => sort_rows(&mut rows, column, kind, controls.sort_direction),
            None => debug!(page = spec.name(), column, "Unknown sort column, keeping insertion order"),
        }
    }

    debug!(
        page = spec.name(),
        total = collection.len(),
        visible = rows.len(),
        "Derived view recomputed"
    );
    rows
}

/// Empty query keeps every record.
pub fn matches_search<R: Record>(record: &R, spec: &ListSpec<R>, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    spec.search_fields().iter().any(|field| {
        record
            .field(field)
            .is_some_and(|value| contains_lowercase(&value.search_text(), query_lower))
    })
}

pub fn matches_filter<R: Record>(record: &R, spec: &ListSpec<R>, key: &str) -> bool {
    if is_all_filter(key) {
        return true;
    }
    match spec.filter() {
        FilterRule::None => true,
        FilterRule::Field(field) => record
            .field(field)
            .is_some_and(|value| value.search_text() == key),
        FilterRule::Tabs(_) => spec
            .tab_predicate(key)
            .is_none_or(|predicate| predicate(record)),
    }
}

/// Stable in both directions: equal keys keep their prior relative order.
fn sort_rows<R: Record>(rows: &mut Collection<R>, column: &str, kind: SortKind, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare_records(a.as_ref(), b.as_ref(), column, kind);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Records without the column sort before records that have it.
pub fn compare_records<R: Record>(a: &R, b: &R, column: &str, kind: SortKind) -> Ordering {
    match (a.field(column), b.field(column)) {
        (Some(x), Some(y)) => compare_values(&x, &y, kind),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_values(x: &FieldValue, y: &FieldValue, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Numeric => match (x, y) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            _ => locale_cmp(&x.search_text(), &y.search_text()),
        },
        SortKind::Date => date_sort_key(&x.search_text()).cmp(&date_sort_key(&y.search_text())),
        SortKind::Text => locale_cmp(&x.search_text(), &y.search_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class_session::{fields, ClassSession};
    use crate::domain::record::collect;

    fn spec() -> ListSpec<ClassSession> {
        ListSpec::new("classes")
            .search_in(&[fields::NAME, fields::INSTRUCTOR, fields::KIND])
            .filter_by_field(fields::KIND)
            .sort_column(fields::NAME, SortKind::Text)
            .sort_column(fields::TIME, SortKind::Text)
    }

    fn classes() -> Collection<ClassSession> {
        collect(vec![
            ClassSession::new("1", "HIIT com Pesos", "08:00", "Carla", "45 min", "Avançado", "Força"),
            ClassSession::new("2", "Yoga Flow", "10:30", "Paulo", "60 min", "Intermediário", "Flexibilidade"),
            ClassSession::new("3", "Boxe Funcional", "19:00", "Roberto", "50 min", "Intermediário", "Força"),
        ])
    }

    #[test]
    fn test_search_then_filter() {
        let rows = derive_view(
            &classes(),
            &spec(),
            &ViewControls::default().with_search("o").with_filter("Força"),
        );
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_unknown_sort_column_keeps_order() {
        let rows = derive_view(
            &classes(),
            &spec(),
            &ViewControls::default().sorted_by("sala", SortDirection::Desc),
        );
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_sort_desc() {
        let rows = derive_view(
            &classes(),
            &spec(),
            &ViewControls::default().sorted_by(fields::NAME, SortDirection::Desc),
        );
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Yoga Flow", "HIIT com Pesos", "Boxe Funcional"]);
    }

    #[test]
    fn test_empty_collection() {
        let rows = derive_view(&Vec::new(), &spec(), &ViewControls::default().with_search("yoga"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_source_is_untouched() {
        let source = classes();
        let before: Vec<ClassSession> = source.iter().map(|r| (**r).clone()).collect();
        let _ = derive_view(&source, &spec(), &ViewControls::default().sorted_by(fields::TIME, SortDirection::Desc));
        let after: Vec<ClassSession> = source.iter().map(|r| (**r).clone()).collect();
        assert_eq!(before, after);
    }
}
