pub mod config;
pub mod controller;
pub mod delete_flow;
pub mod list_state;
pub mod notify;
pub mod selection;
pub mod store;

pub use config::{BlogApiConfig, ConfigError, DEFAULT_REQUEST_TIMEOUT};
pub use controller::{ActionOutcome, BlogListController, BlogListView, SkipReason};
pub use delete_flow::DeleteFlow;
pub use list_state::{recompute_filter, BlogFilter, ListState, StatusCounts};
pub use notify::{BroadcastNotifier, Notifier, Toast, ToastSeverity, TracingNotifier};
pub use selection::Selection;
pub use store::{BlogListing, BlogStore, HttpBlogStore, StoreError};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
