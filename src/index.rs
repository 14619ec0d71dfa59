//! Indexes a list of [`Post`]s by category and by publication year and month.
//! Both groupings are partitions of the input: every post lands in exactly one
//! bucket of each, and within a bucket posts keep their input order. Buckets
//! themselves are ordered by first appearance, which for a newest-first input
//! means newest bucket first.

use indexmap::IndexMap;

use crate::post::Post;

/// Category name → posts in that category.
pub type CategoryBuckets<'a> = IndexMap<&'a str, Vec<&'a Post>>;

/// Month name → posts published that month.
pub type MonthBuckets<'a> = IndexMap<String, Vec<&'a Post>>;

/// Calendar year → month buckets for that year.
pub type DateBuckets<'a> = IndexMap<i32, MonthBuckets<'a>>;

/// The archive's view of a set of posts.
pub struct PostIndex<'a> {
    posts: &'a [Post],
    by_category: CategoryBuckets<'a>,
    by_date: DateBuckets<'a>,
}

impl<'a> PostIndex<'a> {
    /// Indexes `posts`. An empty slice yields empty groupings.
    pub fn new(posts: &'a [Post]) -> PostIndex<'a> {
        PostIndex {
            posts,
            by_category: group_by_category(posts),
            by_date: group_by_year_then_month(posts),
        }
    }

    /// The indexed posts in their original order.
    pub fn posts(&self) -> &'a [Post] {
        self.posts
    }

    pub fn by_category(&self) -> &CategoryBuckets<'a> {
        &self.by_category
    }

    pub fn by_year_then_month(&self) -> &DateBuckets<'a> {
        &self.by_date
    }

    /// The posts in `category`, or `None` if no post has that category.
    pub fn category(&self, category: &str) -> Option<&[&'a Post]> {
        self.by_category.get(category).map(Vec::as_slice)
    }

    /// The posts published in `month` (a full English month name) of `year`.
    pub fn month(&self, year: i32, month: &str) -> Option<&[&'a Post]> {
        self.by_date
            .get(&year)
            .and_then(|months| months.get(month))
            .map(Vec::as_slice)
    }

    /// The first `limit` posts of `category` and the number left over.
    pub fn preview(&self, category: &str, limit: usize) -> Option<Preview<'_, 'a>> {
        self.category(category).map(|posts| {
            let shown = posts.len().min(limit);
            Preview {
                posts: &posts[..shown],
                more: posts.len() - shown,
            }
        })
    }

    pub fn total(&self) -> usize {
        self.posts.len()
    }

    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }

    pub fn year_count(&self) -> usize {
        self.by_date.len()
    }

    /// Category names in alphabetical order.
    pub fn categories_sorted(&self) -> Vec<&'a str> {
        let mut categories: Vec<&'a str> = self.by_category.keys().copied().collect();
        categories.sort_unstable();
        categories
    }

    /// Years with at least one post, most recent first.
    pub fn years_descending(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.by_date.keys().copied().collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }
}

/// A truncated view of a category bucket, as shown on an archive category
/// card.
#[derive(Debug, PartialEq)]
pub struct Preview<'i, 'a> {
    /// The leading posts of the bucket.
    pub posts: &'i [&'a Post],

    /// How many posts were left out.
    pub more: usize,
}

/// Groups `posts` by category, preserving input order within each bucket.
pub fn group_by_category(posts: &[Post]) -> CategoryBuckets<'_> {
    let mut buckets = CategoryBuckets::new();
    for post in posts {
        buckets.entry(post.category.as_str()).or_default().push(post);
    }
    buckets
}

/// Groups `posts` by calendar year and then by month name, preserving input
/// order within each bucket.
pub fn group_by_year_then_month(posts: &[Post]) -> DateBuckets<'_> {
    let mut buckets = DateBuckets::new();
    for post in posts {
        buckets
            .entry(post.year())
            .or_default()
            .entry(post.month_name())
            .or_default()
            .push(post);
    }
    buckets
}
