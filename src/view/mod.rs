pub mod collate;
pub mod controls;
pub mod list_spec;
pub mod pipeline;

pub use controls::{Control, SortDirection, ViewControls, FILTER_ALL};
pub use list_spec::{FilterRule, ListSpec, SortKind};
pub use pipeline::derive_view;
