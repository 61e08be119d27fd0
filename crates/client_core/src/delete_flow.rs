//! Stage-then-confirm delete dialog.

use shared::domain::BlogPost;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    PendingConfirmation(BlogPost),
    InFlight(BlogPost),
}

impl DeleteFlow {
    /// Stages `post` for confirmation, replacing any earlier candidate.
    /// Refused while a delete is in flight.
    pub fn stage(&mut self, post: BlogPost) -> bool {
        if self.is_deleting() {
            return false;
        }
        *self = DeleteFlow::PendingConfirmation(post);
        true
    }

    pub fn cancel(&mut self) -> bool {
        if let DeleteFlow::PendingConfirmation(_) = self {
            *self = DeleteFlow::Idle;
            return true;
        }
        false
    }

    /// Moves a staged candidate in flight and hands it back.
    pub fn begin(&mut self) -> Option<BlogPost> {
        match std::mem::take(self) {
            DeleteFlow::PendingConfirmation(post) => {
                *self = DeleteFlow::InFlight(post.clone());
                Some(post)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Leaves the in-flight state: closes the dialog on success, reopens it
    /// with the same candidate on failure.
    pub fn finish(&mut self, succeeded: bool) {
        if let DeleteFlow::InFlight(post) = std::mem::take(self) {
            if !succeeded {
                *self = DeleteFlow::PendingConfirmation(post);
            }
        }
    }

    pub fn candidate(&self) -> Option<&BlogPost> {
        match self {
            DeleteFlow::Idle => None,
            DeleteFlow::PendingConfirmation(post) | DeleteFlow::InFlight(post) => Some(post),
        }
    }

    pub fn is_dialog_open(&self) -> bool {
        !matches!(self, DeleteFlow::Idle)
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self, DeleteFlow::InFlight(_))
    }
}
