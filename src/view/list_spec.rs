use crate::domain::record::Record;

use super::collate::fold;

/// How values of a sort column compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Numeric,
    Date,
    Text,
}

pub type Predicate<R> = fn(&R) -> bool;

/// Second pipeline step.
pub enum FilterRule<R> {
    /// No filter control on this page.
    None,
    /// Keep records whose field renders exactly as the filter key.
    Field(&'static str),
    /// Named tabs, each with its own predicate. Unknown tab keys keep everything.
    Tabs(Vec<(&'static str, Predicate<R>)>),
}

impl<R> Clone for FilterRule<R> {
    fn clone(&self) -> Self {
        match self {
            FilterRule::None => FilterRule::None,
            FilterRule::Field(field) => FilterRule::Field(field),
            FilterRule::Tabs(tabs) => FilterRule::Tabs(tabs.clone()),
        }
    }
}

/// Page-level configuration of the derived view: which fields are searched,
/// how the filter key applies, and which columns can be sorted.
pub struct ListSpec<R> {
    name: &'static str,
    search_fields: Vec<&'static str>,
    filter: FilterRule<R>,
    sort_columns: Vec<(&'static str, SortKind)>,
}

impl<R> Clone for ListSpec<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            search_fields: self.search_fields.clone(),
            filter: self.filter.clone(),
            sort_columns: self.sort_columns.clone(),
        }
    }
}

impl<R: Record> ListSpec<R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            search_fields: Vec::new(),
            filter: FilterRule::None,
            sort_columns: Vec::new(),
        }
    }

    pub fn search_in(mut self, fields: &[&'static str]) -> Self {
        self.search_fields.extend_from_slice(fields);
        self
    }

    pub fn filter_by_field(mut self, field: &'static str) -> Self {
        self.filter = FilterRule::Field(field);
        self
    }

    pub fn filter_tab(mut self, key: &'static str, predicate: Predicate<R>) -> Self {
        match &mut self.filter {
            FilterRule::Tabs(tabs) => tabs.push((key, predicate)),
            _ => self.filter = FilterRule::Tabs(vec![(key, predicate)]),
        }
        self
    }

    pub fn sort_column(mut self, column: &'static str, kind: SortKind) -> Self {
        self.sort_columns.push((column, kind));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn search_fields(&self) -> &[&'static str] {
        &self.search_fields
    }

    pub fn filter(&self) -> &FilterRule<R> {
        &self.filter
    }

    pub fn sort_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sort_columns.iter().map(|(column, _)| *column)
    }

    pub fn sort_kind(&self, column: &str) -> Option<SortKind> {
        self.sort_columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, kind)| *kind)
    }

    /// Predicate of the tab whose key matches, ignoring case and accents.
    pub fn tab_predicate(&self, key: &str) -> Option<Predicate<R>> {
        match &self.filter {
            FilterRule::Tabs(tabs) => {
                let key = fold(key.trim());
                tabs.iter()
                    .find(|(tab, _)| fold(tab) == key)
                    .map(|(_, predicate)| *predicate)
            }
            _ => None,
        }
    }
}
