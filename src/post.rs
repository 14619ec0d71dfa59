//! Defines the [`Post`] type, the in-memory form of a single journal article.
//! Posts are produced by [`crate::parser::Parser`] and are read-only from then
//! on; every other module borrows them.

use chrono::{Datelike, NaiveDate};
use url::Url;

/// Represents a journal article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// The post's identifier: the stem of its source file (e.g., the slug for
    /// `content/blog/aave-v4.mdx` is `aave-v4`). Unique across all posts.
    pub slug: String,

    /// The title of the post.
    pub title: String,

    /// The publication date of the post.
    pub date: NaiveDate,

    /// The post's category. Never blank.
    pub category: String,

    /// A short plain-text teaser shown in listings.
    pub excerpt: String,

    /// Human-readable reading time, e.g. `5 min read`.
    pub reading_time: String,

    /// Site-relative path of the cover image, if any.
    pub cover_image: Option<String>,

    /// The raw Markdown body (everything after the closing frontmatter fence).
    pub body: String,
}

impl Post {
    /// The calendar year of the post's date.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// The full English name of the post's month (e.g. `January`).
    pub fn month_name(&self) -> String {
        self.date.format("%B").to_string()
    }

    /// The URL of the post's page, `{site_root}blog/{slug}`.
    pub fn url(&self, site_root: &Url) -> Result<Url, url::ParseError> {
        site_root.join(&format!("blog/{}", self.slug))
    }
}

#[cfg(test)]
pub(crate) fn fixture(slug: &str, date: &str, category: &str) -> Post {
    Post {
        slug: slug.to_owned(),
        title: slug.to_uppercase(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: category.to_owned(),
        excerpt: String::new(),
        reading_time: String::from("1 min read"),
        cover_image: None,
        body: String::new(),
    }
}

/// Generates post lists with unique slugs drawn from a small pool of
/// categories and dates, so collisions within buckets are common.
#[cfg(test)]
pub(crate) fn arb_posts() -> impl proptest::strategy::Strategy<Value = Vec<Post>> {
    use proptest::prelude::*;

    const CATEGORIES: &[&str] =
        &["Protocol Updates", "Integration", "Case Studies", "Regulatory"];
    let entry = (0..CATEGORIES.len(), 2024i32..2027, 1u32..=12, 1u32..=28);
    prop::collection::vec(entry, 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (category, year, month, day))| Post {
                slug: format!("post-{}", i),
                title: format!("Post {}", i),
                date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
                category: CATEGORIES[category].to_owned(),
                excerpt: String::new(),
                reading_time: String::from("1 min read"),
                cover_image: None,
                body: String::new(),
            })
            .collect()
    })
}
