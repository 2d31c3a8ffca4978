//! Declarations of the portfolio's collections

use lazy_static::lazy_static;

use super::{CollectionSchema, FieldKind, FieldSpec, FieldValue};

lazy_static! {
    static ref POSTS: CollectionSchema = CollectionSchema {
        name: "posts",
        entity: "Post",
        patterns: patterns("posts"),
        fields: vec![
            FieldSpec::required("title", FieldKind::String { max: Some(99) }),
            FieldSpec::required("slug", FieldKind::Slug),
            FieldSpec::required("date", FieldKind::IsoDate),
            FieldSpec::required("category", FieldKind::String { max: None }),
            FieldSpec::required("readTime", FieldKind::String { max: None }),
            FieldSpec::optional("excerpt", FieldKind::String { max: Some(300) }),
            FieldSpec::with_default("featured", FieldKind::Boolean, FieldValue::Bool(false)),
            FieldSpec::required("content", FieldKind::Markup),
        ],
    };
    static ref WORKS: CollectionSchema = CollectionSchema {
        name: "works",
        entity: "Work",
        patterns: patterns("works"),
        fields: vec![
            FieldSpec::required("title", FieldKind::String { max: Some(99) }),
            FieldSpec::required("subtitle", FieldKind::String { max: Some(200) }),
            FieldSpec::required("slug", FieldKind::Slug),
            FieldSpec::required("date", FieldKind::IsoDate),
            FieldSpec::required("timeline", FieldKind::String { max: None }),
            FieldSpec::required("role", FieldKind::String { max: None }),
            FieldSpec::required("techStack", FieldKind::StringList),
            FieldSpec::optional("liveUrl", FieldKind::Url),
            FieldSpec::optional("videoUrl", FieldKind::Url),
            FieldSpec::with_default("featured", FieldKind::Boolean, FieldValue::Bool(false)),
            FieldSpec::required("content", FieldKind::Markup),
        ],
    };
}

/// `<dir>/**/*.mdx` and `<dir>/**/*.md`
fn patterns(dir: &str) -> Vec<glob::Pattern> {
    ["mdx", "md"]
        .iter()
        .map(|ext| glob::Pattern::new(&format!("{}/**/*.{}", dir, ext)).unwrap())
        .collect()
}

/// Blog posts
pub fn posts_schema() -> CollectionSchema {
    POSTS.clone()
}

/// Case studies
pub fn works_schema() -> CollectionSchema {
    WORKS.clone()
}
