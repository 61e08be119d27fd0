use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;

/// Opaque, server-assigned post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlogId(pub String);

impl BlogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlogId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    Draft,
    Published,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            BlogStatus::Draft => BlogStatus::Published,
            BlogStatus::Published => BlogStatus::Draft,
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlogStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Post category. Values outside the known set are carried through untouched
/// so a post never loses its category on a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlogCategory {
    WebDev,
    Mobile,
    Ecommerce,
    Strategy,
    CaseStudies,
    Other(String),
}

impl BlogCategory {
    pub fn as_str(&self) -> &str {
        match self {
            BlogCategory::WebDev => "web-dev",
            BlogCategory::Mobile => "mobile",
            BlogCategory::Ecommerce => "ecommerce",
            BlogCategory::Strategy => "strategy",
            BlogCategory::CaseStudies => "case-studies",
            BlogCategory::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlogCategory::Other(_))
    }
}

impl From<String> for BlogCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "web-dev" => BlogCategory::WebDev,
            "mobile" => BlogCategory::Mobile,
            "ecommerce" => BlogCategory::Ecommerce,
            "strategy" => BlogCategory::Strategy,
            "case-studies" => BlogCategory::CaseStudies,
            _ => BlogCategory::Other(value),
        }
    }
}

impl From<BlogCategory> for String {
    fn from(value: BlogCategory) -> Self {
        match value {
            BlogCategory::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category criterion for the admin list. `All` is filter-only and never a
/// valid category on a post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(BlogCategory),
}

impl CategoryFilter {
    pub const ALL: &'static str = "all";

    pub fn matches(&self, category: &BlogCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::EmptyCategory);
        }
        if s == Self::ALL {
            return Ok(CategoryFilter::All);
        }
        Ok(CategoryFilter::Only(BlogCategory::from(s.to_string())))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Self::ALL),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A blog post as served by `/api/blogs`.
///
/// `source` is the JSON object exactly as received. Encoding starts from it
/// and only writes a typed field back when its value differs from what the
/// source already says, so untouched fields (including absent or `null` ones
/// and anything the admin screen does not interpret) go back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct BlogPost {
    pub id: BlogId,
    pub title: String,
    pub category: BlogCategory,
    pub status: BlogStatus,
    pub author: Option<Author>,
    pub tags: Vec<String>,
    pub image: String,
    pub featured: bool,
    pub source: Map<String, Value>,
}

#[derive(Deserialize)]
struct PostFields {
    id: BlogId,
    title: String,
    category: BlogCategory,
    status: BlogStatus,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    featured: bool,
}

impl BlogPost {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|author| author.name.as_deref())
            .unwrap_or_default()
    }

    /// Copy of this post carrying `status` and nothing else changed.
    pub fn with_status(&self, status: BlogStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl TryFrom<Map<String, Value>> for BlogPost {
    type Error = serde_json::Error;

    fn try_from(source: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: PostFields = serde_json::from_value(Value::Object(source.clone()))?;
        Ok(Self {
            id: fields.id,
            title: fields.title,
            category: fields.category,
            status: fields.status,
            author: fields.author,
            tags: fields.tags,
            image: fields.image,
            featured: fields.featured,
            source,
        })
    }
}

impl From<BlogPost> for Map<String, Value> {
    fn from(post: BlogPost) -> Self {
        let mut map = post.source;
        write_field(&mut map, "id", &post.id);
        write_field(&mut map, "title", &post.title);
        write_field(&mut map, "category", &post.category);
        write_field(&mut map, "status", &post.status);
        write_if_changed(&mut map, "author", &post.author);
        write_if_changed(&mut map, "tags", &post.tags);
        write_if_changed(&mut map, "image", &post.image);
        write_if_changed(&mut map, "featured", &post.featured);
        map
    }
}

fn write_field<T: Serialize>(map: &mut Map<String, Value>, key: &str, value: &T) {
    if let Ok(value) = serde_json::to_value(value) {
        map.insert(key.to_string(), value);
    }
}

/// Writes `value` only when the map does not already imply it (an absent or
/// `null` entry implies the type's default).
fn write_if_changed<T>(map: &mut Map<String, Value>, key: &str, value: &T)
where
    T: Serialize + DeserializeOwned + Default + PartialEq,
{
    let implied: T = map
        .get(key)
        .cloned()
        .and_then(|raw| serde_json::from_value(raw).ok())
        .unwrap_or_default();
    if &implied != value {
        write_field(map, key, value);
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
