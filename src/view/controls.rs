use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::collate::fold;

/// Filter key that disables the category/status filter.
pub const FILTER_ALL: &str = "all";

/// Both sentinels seen on the pages ("all" on payments, "Todos" on the feed).
pub fn is_all_filter(key: &str) -> bool {
    let key = fold(key.trim());
    key.is_empty() || key == "all" || key == "todos"
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// UI-control state of a list page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewControls {
    pub search: String,
    pub filter: String,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    pub tab: Option<String>,
}

impl Default for ViewControls {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: FILTER_ALL.to_string(),
            sort_column: None,
            sort_direction: SortDirection::Asc,
            tab: None,
        }
    }
}

/// A single control change, as dispatched by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Search(String),
    Filter(String),
    SortColumn(String),
    SortDirection(SortDirection),
    ClearSort,
    Tab(String),
}

impl ViewControls {
    pub fn with_search(mut self, query: &str) -> Self {
        self.search = query.to_string();
        self
    }

    pub fn with_filter(mut self, key: &str) -> Self {
        self.filter = key.to_string();
        self
    }

    pub fn sorted_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.sort_column = Some(column.to_string());
        self.sort_direction = direction;
        self
    }

    pub fn set(&mut self, control: Control) {
        match control {
            Control::Search(query) => self.search = query,
            Control::Filter(key) => self.filter = key,
            Control::SortColumn(column) => self.sort_column = Some(column),
            Control::SortDirection(direction) => self.sort_direction = direction,
            Control::ClearSort => self.sort_column = None,
            Control::Tab(tab) => self.tab = Some(tab),
        }
    }

    /// Header-click behaviour: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.sort_column.as_deref() == Some(column) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_column = Some(column.to_string());
            self.sort_direction = SortDirection::Asc;
        }
    }
}
