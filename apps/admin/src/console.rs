use client_core::{BlogListView, Notifier, Toast, ToastSeverity};

/// Prints toasts to stderr so they never mix with listing output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        match toast.severity {
            ToastSeverity::Success => eprintln!("ok: {}", toast.message),
            ToastSeverity::Error => eprintln!("error: {}", toast.message),
        }
    }
}

pub fn render_list(view: &BlogListView) -> String {
    let mut out = format!(
        "{} of {} posts ({} published, {} drafts) | search: {:?} | category: {}\n",
        view.posts.len(),
        view.total,
        view.counts.published,
        view.counts.drafts,
        view.filter.search_term,
        view.filter.category,
    );
    for post in &view.posts {
        let author = match post.author_name() {
            "" => "-",
            name => name,
        };
        out.push_str(&format!(
            "{}\t{:<9}\t{:<12}\t{}{}\t{}\n",
            post.id,
            post.status.as_str(),
            post.category.as_str(),
            if post.featured { "* " } else { "" },
            post.title,
            author,
        ));
    }
    out
}
