pub mod actions;
pub mod collectors;
pub mod config;
pub mod dataset;
pub mod explorer;
pub mod formatter;
pub mod home;
pub mod logging;
pub mod page;
pub mod pie;
pub mod plot;
pub mod projects;
pub mod records;
pub mod scales;
pub mod selection;
pub mod summary;
pub mod tooltip;

pub use actions::Action;
pub use dataset::Dataset;
pub use explorer::{Explorer, ViewState};
