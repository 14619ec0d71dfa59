//! Plain-text renderings of the journal grid, the archive page and the
//! category list, as printed by the `journal` binary.

use std::fmt::Write;

use chrono::Datelike;
use url::Url;

use crate::filter::FilterView;
use crate::index::PostIndex;

/// Number of posts listed on each archive category card.
pub const PREVIEW_LIMIT: usize = 5;

/// Renders a filtered journal grid followed by its summary line, or the
/// empty-state message when nothing matched.
pub fn journal_grid(view: &FilterView, site_root: &Url) -> Result<String, url::ParseError> {
    let mut out = String::new();
    if view.is_empty() {
        out.push_str(&view.empty_message());
        out.push('\n');
        return Ok(out);
    }

    for post in &view.posts {
        // writing to a String can't fail
        let _ = writeln!(
            out,
            "{} · {}\n{}\n{}\n{} · {}\n",
            post.category.to_uppercase(),
            post.date.format("%m.%d.%y"),
            post.title,
            post.excerpt,
            post.reading_time,
            post.url(site_root)?,
        );
    }
    out.push_str(&view.summary());
    out.push('\n');
    Ok(out)
}

/// Renders the archive: the stats line, one card per category (alphabetical)
/// and the timeline grouped by year (newest first) and month.
pub fn archive(index: &PostIndex) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} articles · {} categories · {} years\n",
        index.total(),
        index.category_count(),
        index.year_count()
    );

    out.push_str("Browse by Category\n\n");
    for category in index.categories_sorted() {
        if let Some(preview) = index.preview(category, PREVIEW_LIMIT) {
            let _ = writeln!(out, "{} ({})", category, preview.posts.len() + preview.more);
            for post in preview.posts {
                let _ = writeln!(out, "  - {}", post.title);
            }
            if preview.more > 0 {
                let _ = writeln!(out, "  +{} more articles", preview.more);
            }
            out.push('\n');
        }
    }

    out.push_str("Timeline\n");
    let by_date = index.by_year_then_month();
    for year in index.years_descending() {
        let _ = writeln!(out, "\n{}", year);
        for (month, posts) in &by_date[&year] {
            let _ = writeln!(out, "  {}", month);
            for post in posts {
                let _ = writeln!(
                    out,
                    "    {:>2} {} · {} · {} ({})",
                    post.date.day(),
                    post.date.format("%a"),
                    post.category.to_uppercase(),
                    post.title,
                    post.reading_time,
                );
            }
        }
    }
    out
}

/// Renders each category with its post count, alphabetically.
pub fn categories(index: &PostIndex) -> String {
    let mut out = String::new();
    for category in index.categories_sorted() {
        let count = index.category(category).map_or(0, |posts| posts.len());
        let _ = writeln!(out, "{} ({})", category, count);
    }
    out
}
