use shared::domain::{BlogId, BlogPost, BlogStatus, CategoryFilter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogFilter {
    pub search_term: String,
    pub category: CategoryFilter,
}

impl BlogFilter {
    pub fn new(search_term: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        self.category.matches(&post.category) && matches_search(post, &self.search_term)
    }
}

/// Case-insensitive substring match on title, author name, or any tag.
/// An empty term matches everything.
fn matches_search(post: &BlogPost, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

    hit(&post.title) || hit(post.author_name()) || post.tags.iter().any(|tag| hit(tag))
}

/// Posts from `posts` passing `filter`, in collection order.
pub fn recompute_filter(posts: &[BlogPost], filter: &BlogFilter) -> Vec<BlogPost> {
    posts
        .iter()
        .filter(|post| filter.matches(post))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub published: usize,
    pub drafts: usize,
}

#[derive(Debug, Default)]
pub struct ListState {
    all: Vec<BlogPost>,
    filtered: Vec<BlogPost>,
    filter: BlogFilter,
}

impl ListState {
    pub fn all(&self) -> &[BlogPost] {
        &self.all
    }

    pub fn filtered(&self) -> &[BlogPost] {
        &self.filtered
    }

    pub fn filter(&self) -> &BlogFilter {
        &self.filter
    }

    pub fn find(&self, id: &BlogId) -> Option<&BlogPost> {
        self.all.iter().find(|post| &post.id == id)
    }

    pub fn replace_all(&mut self, posts: Vec<BlogPost>) {
        self.all = posts;
        self.refresh();
    }

    pub fn set_search_term(&mut self, search_term: impl Into<String>) {
        self.filter.search_term = search_term.into();
        self.refresh();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.refresh();
    }

    pub fn remove(&mut self, id: &BlogId) -> bool {
        let before = self.all.len();
        self.all.retain(|post| &post.id != id);
        self.filtered.retain(|post| &post.id != id);
        before != self.all.len()
    }

    /// Sets `status` on the post with `id` in both the collection and the view.
    pub fn patch_status(&mut self, id: &BlogId, status: BlogStatus) -> bool {
        let mut patched = false;
        for post in self
            .all
            .iter_mut()
            .chain(self.filtered.iter_mut())
            .filter(|post| &post.id == id)
        {
            post.status = status;
            patched = true;
        }
        patched
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.all
            .iter()
            .fold(StatusCounts::default(), |mut counts, post| {
                match post.status {
                    BlogStatus::Published => counts.published += 1,
                    BlogStatus::Draft => counts.drafts += 1,
                }
                counts
            })
    }

    fn refresh(&mut self) {
        self.filtered = recompute_filter(&self.all, &self.filter);
    }
}
