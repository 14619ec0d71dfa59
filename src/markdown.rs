//! Plain-text views of a post's Markdown body. These back the `excerpt` and
//! `readingTime` fallbacks for posts whose frontmatter omits them.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// The marker separating a post's summary from the rest of its body.
pub const FOLD_TAG: &str = "<!-- more -->";

/// Reading speed used for [`reading_time`].
const WORDS_PER_MINUTE: usize = 200;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Block-level tags; text on either side of one belongs to different words.
fn is_block(tag: &Tag) -> bool {
    !matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link(..) | Tag::Image(..)
    )
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders `markdown` as whitespace-collapsed plain text. Markup, HTML and
/// link targets are dropped; text and inline code are kept.
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::new();
    for ev in Parser::new_ext(markdown, options()) {
        match ev {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak | Event::Rule => out.push(' '),
            Event::End(tag) if is_block(&tag) => out.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&out)
}

/// Returns the plain text of the first paragraph in `markdown`, or an empty
/// string if there is none.
pub fn first_paragraph(markdown: &str) -> String {
    let mut out = String::new();
    let mut inside = false;
    for ev in Parser::new_ext(markdown, options()) {
        match ev {
            Event::Start(Tag::Paragraph) => inside = true,
            Event::End(Tag::Paragraph) if inside => break,
            Event::Text(text) | Event::Code(text) if inside => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak if inside => out.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&out)
}

/// Derives an excerpt from a post body: the text above the fold when the body
/// is folded, otherwise the first paragraph.
pub fn excerpt(markdown: &str) -> String {
    match markdown.find(FOLD_TAG) {
        Some(i) => plain_text(&markdown[..i]),
        None => first_paragraph(markdown),
    }
}

/// Counts the words in the plain-text rendering of `markdown`.
pub fn word_count(markdown: &str) -> usize {
    plain_text(markdown).split_whitespace().count()
}

/// Formats an estimated reading time, e.g. `4 min read`. Never less than one
/// minute.
pub fn reading_time(markdown: &str) -> String {
    let words = word_count(markdown);
    let minutes = ((words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}
