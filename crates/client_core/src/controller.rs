//! Admin blog list: fetch once, filter and select locally, and reconcile
//! local state after server-confirmed deletes and status changes.

use std::{collections::HashSet, sync::Arc};

use shared::domain::{BlogId, BlogPost, BlogStatus, CategoryFilter};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    delete_flow::DeleteFlow,
    list_state::{BlogFilter, ListState, StatusCounts},
    notify::{Notifier, Toast},
    selection::Selection,
    store::BlogStore,
};

const LOAD_FAILED: &str = "Failed to fetch blogs";
const DELETE_SUCCEEDED: &str = "Blog deleted successfully";
const DELETE_FAILED: &str = "Failed to delete blog";
const STATUS_FAILED: &str = "Failed to update blog status";
const MUTATION_PENDING: &str = "Another change to this blog is still in progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server confirmed the action and local state was reconciled.
    Applied,
    /// The store call failed; local state is unchanged and an error toast was raised.
    Failed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disposed,
    NothingStaged,
    AlreadyInFlight,
    UnknownPost,
}

/// Owned snapshot of everything the list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogListView {
    pub posts: Vec<BlogPost>,
    pub total: usize,
    pub counts: StatusCounts,
    pub filter: BlogFilter,
    pub selected: Vec<BlogId>,
    pub all_selected: bool,
    pub delete_candidate: Option<BlogPost>,
    pub deleting: bool,
    pub loading: bool,
}

#[derive(Default)]
struct ControllerState {
    list: ListState,
    selection: Selection,
    delete_flow: DeleteFlow,
    inflight: HashSet<BlogId>,
    /// Loads started and not yet finished; overlapping loads each hold one.
    pending_loads: usize,
    disposed: bool,
}

pub struct BlogListController {
    store: Arc<dyn BlogStore>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<ControllerState>,
}

impl BlogListController {
    pub fn new(store: Arc<dyn BlogStore>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            store,
            notifier,
            inner: Mutex::new(ControllerState::default()),
        })
    }

    /// Fetches the full collection. On failure the current collection is kept.
    pub async fn load(&self) -> ActionOutcome {
        {
            let mut guard = self.inner.lock().await;
            if guard.disposed {
                return ActionOutcome::Skipped(SkipReason::Disposed);
            }
            guard.pending_loads += 1;
        }

        let result = self.store.list_blogs().await;

        let mut guard = self.inner.lock().await;
        guard.pending_loads = guard.pending_loads.saturating_sub(1);
        if guard.disposed {
            return ActionOutcome::Skipped(SkipReason::Disposed);
        }
        match result {
            Ok(listing) => {
                info!(
                    count = listing.posts.len(),
                    skipped = listing.skipped,
                    "loaded blog list"
                );
                guard.list.replace_all(listing.posts);
                drop(guard);
                if listing.skipped > 0 {
                    self.notifier
                        .notify(Toast::error(skipped_posts_message(listing.skipped)));
                }
                ActionOutcome::Applied
            }
            Err(err) => {
                drop(guard);
                warn!(error = %err, "failed to load blog list");
                self.notifier.notify(Toast::error(err.user_message(LOAD_FAILED)));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn set_search_term(&self, search_term: impl Into<String>) {
        self.inner.lock().await.list.set_search_term(search_term);
    }

    pub async fn set_category_filter(&self, category: CategoryFilter) {
        self.inner.lock().await.list.set_category(category);
    }

    pub async fn toggle_select(&self, id: &BlogId) {
        self.inner.lock().await.selection.toggle(id);
    }

    pub async fn toggle_select_all(&self) {
        let mut guard = self.inner.lock().await;
        let ControllerState {
            list, selection, ..
        } = &mut *guard;
        selection.toggle_all(list.filtered());
    }

    /// Opens the confirmation dialog for `post`. No request is sent yet.
    pub async fn request_delete(&self, post: &BlogPost) -> bool {
        let mut guard = self.inner.lock().await;
        if guard.disposed {
            return false;
        }
        guard.delete_flow.stage(post.clone())
    }

    pub async fn cancel_delete(&self) -> bool {
        self.inner.lock().await.delete_flow.cancel()
    }

    /// Sends the delete for the staged candidate.
    pub async fn confirm_delete(&self) -> ActionOutcome {
        let candidate = {
            let mut guard = self.inner.lock().await;
            if guard.disposed {
                return ActionOutcome::Skipped(SkipReason::Disposed);
            }
            if guard.delete_flow.is_deleting() {
                return ActionOutcome::Skipped(SkipReason::AlreadyInFlight);
            }
            let Some(staged_id) = guard.delete_flow.candidate().map(|post| post.id.clone())
            else {
                return ActionOutcome::Skipped(SkipReason::NothingStaged);
            };
            if guard.inflight.contains(&staged_id) {
                drop(guard);
                self.notifier.notify(Toast::error(MUTATION_PENDING));
                return ActionOutcome::Skipped(SkipReason::AlreadyInFlight);
            }
            let Some(post) = guard.delete_flow.begin() else {
                return ActionOutcome::Skipped(SkipReason::NothingStaged);
            };
            guard.inflight.insert(post.id.clone());
            post
        };

        debug!(blog_id = %candidate.id, "deleting blog");
        let result = self.store.delete_blog(&candidate.id).await;

        let mut guard = self.inner.lock().await;
        guard.inflight.remove(&candidate.id);
        if guard.disposed {
            return ActionOutcome::Skipped(SkipReason::Disposed);
        }
        match result {
            Ok(()) => {
                guard.delete_flow.finish(true);
                guard.list.remove(&candidate.id);
                guard.selection.forget(&candidate.id);
                drop(guard);
                info!(blog_id = %candidate.id, "blog deleted");
                self.notifier.notify(Toast::success(DELETE_SUCCEEDED));
                ActionOutcome::Applied
            }
            Err(err) => {
                guard.delete_flow.finish(false);
                drop(guard);
                warn!(blog_id = %candidate.id, error = %err, "failed to delete blog");
                self.notifier
                    .notify(Toast::error(err.user_message(DELETE_FAILED)));
                ActionOutcome::Failed
            }
        }
    }

    /// Flips `draft` and `published` on the post with `id`, sending the full
    /// post with only the status changed.
    pub async fn toggle_status(&self, id: &BlogId) -> ActionOutcome {
        let (payload, next) = {
            let mut guard = self.inner.lock().await;
            if guard.disposed {
                return ActionOutcome::Skipped(SkipReason::Disposed);
            }
            let Some(current) = guard.list.find(id) else {
                return ActionOutcome::Skipped(SkipReason::UnknownPost);
            };
            let next = current.status.toggled();
            let payload = current.with_status(next);
            if !guard.inflight.insert(id.clone()) {
                drop(guard);
                self.notifier.notify(Toast::error(MUTATION_PENDING));
                return ActionOutcome::Skipped(SkipReason::AlreadyInFlight);
            }
            (payload, next)
        };

        debug!(blog_id = %id, status = %next, "updating blog status");
        let result = self.store.update_blog(&payload).await;

        let mut guard = self.inner.lock().await;
        guard.inflight.remove(id);
        if guard.disposed {
            return ActionOutcome::Skipped(SkipReason::Disposed);
        }
        match result {
            Ok(()) => {
                guard.list.patch_status(id, next);
                drop(guard);
                info!(blog_id = %id, status = %next, "blog status updated");
                self.notifier.notify(Toast::success(status_changed_message(next)));
                ActionOutcome::Applied
            }
            Err(err) => {
                drop(guard);
                warn!(blog_id = %id, error = %err, "failed to update blog status");
                self.notifier
                    .notify(Toast::error(err.user_message(STATUS_FAILED)));
                ActionOutcome::Failed
            }
        }
    }

    /// Tears the view down. Responses arriving afterwards are ignored.
    pub async fn dispose(&self) {
        let mut guard = self.inner.lock().await;
        guard.disposed = true;
        guard.delete_flow = DeleteFlow::Idle;
    }

    pub async fn is_mutation_in_flight(&self, id: &BlogId) -> bool {
        self.inner.lock().await.inflight.contains(id)
    }

    pub async fn snapshot(&self) -> BlogListView {
        let guard = self.inner.lock().await;
        let visible = guard.list.filtered();
        BlogListView {
            posts: visible.to_vec(),
            total: guard.list.all().len(),
            counts: guard.list.status_counts(),
            filter: guard.list.filter().clone(),
            selected: guard.selection.sorted_ids(),
            all_selected: guard.selection.all_selected(visible),
            delete_candidate: guard.delete_flow.candidate().cloned(),
            deleting: guard.delete_flow.is_deleting(),
            loading: guard.pending_loads > 0,
        }
    }
}

fn skipped_posts_message(skipped: usize) -> String {
    match skipped {
        1 => "1 post could not be displayed".to_string(),
        n => format!("{n} posts could not be displayed"),
    }
}

fn status_changed_message(status: BlogStatus) -> String {
    format!("Blog status changed to {status}")
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
