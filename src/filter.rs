//! Category filtering for the journal grid. The current selection is a plain
//! [`Selection`] value passed into [`filter`]; there is no hidden state.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::post::Post;

/// The label of the "no filter" option.
pub const ALL: &str = "ALL";

/// The category chosen in the filter bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Every post, regardless of category.
    #[default]
    All,

    /// Only posts whose category equals the given name exactly. A category
    /// named [`ALL`] behaves like [`Selection::All`].
    Category(String),
}

impl Selection {
    /// Selects `category`. Selecting [`ALL`] is the same as [`Selection::reset`].
    pub fn select(&mut self, category: &str) {
        *self = category.parse().unwrap_or_default();
    }

    /// Clears the selection back to [`Selection::All`].
    pub fn reset(&mut self) {
        *self = Selection::All;
    }

    /// The label shown for this selection in the filter bar.
    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Category(category) => category.as_str(),
        }
    }

    /// Returns `true` for [`Selection::All`] and for a category spelled
    /// [`ALL`].
    pub fn is_all(&self) -> bool {
        self.label() == ALL
    }

    /// Returns `true` if `post` passes this selection.
    pub fn matches(&self, post: &Post) -> bool {
        self.is_all() || post.category == self.label()
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    /// Parses [`ALL`] as [`Selection::All`] and anything else as a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            ALL => Selection::All,
            category => Selection::Category(category.to_owned()),
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the posts that pass `selection`, in input order. An unknown
/// category yields an empty list.
pub fn filter<'a, I>(posts: I, selection: &Selection) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .filter(|post| selection.matches(post))
        .collect()
}

/// A filtered listing: the selection together with the posts that passed it.
pub struct FilterView<'a> {
    pub selection: Selection,
    pub posts: Vec<&'a Post>,
}

impl<'a> FilterView<'a> {
    pub fn new(posts: &'a [Post], selection: Selection) -> FilterView<'a> {
        FilterView {
            posts: filter(posts, &selection),
            selection,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The line printed under a non-empty listing, e.g.
    /// `Showing 2 articles in "Regulatory"`.
    pub fn summary(&self) -> String {
        let count = self.posts.len();
        let mut summary = format!(
            "Showing {} article{}",
            count,
            if count == 1 { "" } else { "s" }
        );
        if !self.selection.is_all() {
            summary.push_str(&format!(" in \"{}\"", self.selection));
        }
        summary
    }

    /// The message printed in place of an empty listing.
    pub fn empty_message(&self) -> String {
        if self.selection.is_all() {
            String::from("No articles yet. Check back soon!")
        } else {
            format!("No articles in \"{}\" yet. Check back soon!", self.selection)
        }
    }
}

/// One option in the filter bar.
#[derive(Debug, PartialEq, Eq)]
pub struct FilterOption<'a> {
    pub label: &'a str,
    pub selected: bool,
}

/// The options of the filter bar: [`ALL`] followed by `categories`, with the
/// option for `selection` marked.
pub fn filter_bar<'a>(categories: &'a [String], selection: &Selection) -> Vec<FilterOption<'a>> {
    std::iter::once(ALL)
        .chain(categories.iter().map(String::as_str))
        .map(|label| FilterOption {
            label,
            selected: label == selection.label(),
        })
        .collect()
}
