/// Path segments of the blog collection resource, relative to the API base.
/// Item urls append the post id as one more segment.
pub const BLOGS_PATH: [&str; 2] = ["api", "blogs"];
