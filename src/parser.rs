//! Defines the [`Parser`] and [`Error`] types: the logic for loading journal
//! posts from the file system into memory. Loading is all-or-nothing; a single
//! bad file fails the whole load.

use std::{
    collections::HashSet,
    fs::{read_dir, read_to_string},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{markdown, post::Post};

/// File extensions recognized as post sources.
pub const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Returns `true` if `path` has one of the [`POST_EXTENSIONS`].
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| POST_EXTENSIONS.contains(&ext))
}

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// The directory containing the post source files. It is not searched
    /// recursively.
    source_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser over `source_directory`.
    pub fn new(source_directory: &'a Path) -> Parser<'a> {
        Parser { source_directory }
    }

    /// Searches the source directory for post files (extension `.md` or
    /// `.mdx`) and returns a list of [`Post`] objects sorted by date (most
    /// recent first). Posts sharing a date keep file-name order. Each post file
    /// must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title`, `date`, `category` and
    ///    optionally `excerpt`, `readingTime` and `coverImage`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Aave v4 for institutions
    /// date: 2026-01-05
    /// category: Protocol Updates
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self) -> Result<Vec<Post>> {
        let entries = read_dir(self.source_directory).map_err(|e| {
            Error::Annotated(
                format!(
                    "reading content directory `{}`",
                    self.source_directory.display()
                ),
                Box::new(Error::Io(e)),
            )
        })?;

        let mut sources: Vec<PathBuf> = Vec::new();
        for result in entries {
            let path = result?.path();
            if path.is_file() && is_post_file(&path) {
                sources.push(path);
            }
        }
        sources.sort();

        let mut slugs: HashSet<String> = HashSet::new();
        let mut posts = Vec::with_capacity(sources.len());
        for path in &sources {
            let post = self.parse_post(path)?;
            if !slugs.insert(post.slug.clone()) {
                return Err(Error::Annotated(
                    format!("parsing post `{}`", path.display()),
                    Box::new(Error::DuplicateSlug(post.slug)),
                ));
            }
            debug!(slug = %post.slug, date = %post.date, "parsed post");
            posts.push(post);
        }

        // `sort_by` is stable, so same-day posts keep file-name order.
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        info!(
            count = posts.len(),
            directory = %self.source_directory.display(),
            "loaded posts"
        );
        Ok(posts)
    }

    /// Parses a single [`Post`] from the file at `path`. The post's slug is
    /// the file stem (e.g., the slug for `{source_directory}/foo.mdx` is
    /// `foo`).
    pub fn parse_post(&self, path: &Path) -> Result<Post> {
        match Self::_parse_post(path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(path: &Path) -> Result<Post> {
        let slug = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;
        parse_post_str(slug, &read_to_string(path)?)
    }
}

/// Locates the frontmatter in `input` and returns the tuple
/// `(yaml_start, yaml_stop, body_start)`. The opening fence must be the first
/// line of the input and the closing fence must sit on a line of its own.
pub fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    let yaml_start = match input.strip_prefix(FENCE) {
        Some(rest) if rest.starts_with('\n') => FENCE.len() + 1,
        Some(rest) if rest.starts_with("\r\n") => FENCE.len() + 2,
        _ => return Err(Error::FrontmatterMissingStartFence),
    };

    let mut line_start = yaml_start;
    for line in input[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok((yaml_start, line_start, line_start + line.len()));
        }
        line_start += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// Parses a [`Post`] from its `slug` and the full contents of its source file.
pub fn parse_post_str(slug: &str, input: &str) -> Result<Post> {
    let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
    let frontmatter: Frontmatter =
        serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
    let body = &input[body_start..];

    let title = required(frontmatter.title, "title")?;
    let date = parse_date(&required(frontmatter.date, "date")?)?;
    let category = required(frontmatter.category, "category")?;

    Ok(Post {
        slug: slug.to_owned(),
        title,
        date,
        category,
        excerpt: optional(frontmatter.excerpt)
            .unwrap_or_else(|| markdown::excerpt(body)),
        reading_time: optional(frontmatter.reading_time)
            .unwrap_or_else(|| markdown::reading_time(body)),
        cover_image: optional(frontmatter.cover_image),
        body: body.to_owned(),
    })
}

/// Treats missing and blank values alike.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    optional(value).ok_or(Error::MissingField(field))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date.
fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|err| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.date_naive())
                .map_err(|_| err)
        })
        .map_err(|source| Error::InvalidDate {
            value: value.to_owned(),
            source,
        })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    /// The title of the post.
    title: Option<String>,

    /// The date of the post.
    date: Option<String>,

    /// The category of the post.
    category: Option<String>,

    excerpt: Option<String>,
    reading_time: Option<String>,
    cover_image: Option<String>,
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading [`Post`] objects.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    #[error("Post must begin with `---`")]
    FrontmatterMissingStartFence,

    /// Returned when the starting fence was found but the ending one was
    /// missing.
    #[error("Missing closing `---`")]
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    /// Returned when a required frontmatter field is absent or blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Returned when the `date` field isn't a valid calendar date.
    #[error("invalid date `{value}`")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    /// Returned when two source files map to the same slug.
    #[error("duplicate slug `{0}`")]
    DuplicateSlug(String),

    /// Returned when a source file name isn't valid UTF-8.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error with an annotation.
    #[error("{0}")]
    Annotated(String, #[source] Box<Error>),
}

impl Error {
    /// Strips [`Error::Annotated`] layers and returns the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Annotated(_, err) => err.root(),
            err => err,
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> std::io::Result<()> {
        fs::write(dir.join(name), contents)
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let posts = Parser::new(Path::new("./testdata/posts/")).parse_posts()?;

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            vec!["usdc-bank-rails", "aave-v4-institutions", "mica-update"],
            slugs
        );

        let aave = &posts[1];
        assert_eq!("Aave v4 for Institutions", aave.title);
        assert_eq!(NaiveDate::from_ymd_opt(2026, 1, 5), Some(aave.date));
        assert_eq!("Protocol Updates", aave.category);
        assert_eq!("What changes for treasury desks.", aave.excerpt);
        assert_eq!("6 min read", aave.reading_time);
        assert_eq!(Some("/images/blog/aave-v4-institutions.jpg"), aave.cover_image.as_deref());
        Ok(())
    }

    #[test]
    fn test_parse_post_fallbacks() -> Result<()> {
        let input = "---\ntitle: Hello\ndate: 2025-12-01\ncategory: Regulatory\n---\n\
                     # Heading\n\nFirst *paragraph*.\n\nSecond.\n";
        let post = parse_post_str("hello", input)?;
        assert_eq!("First paragraph.", post.excerpt);
        assert_eq!("1 min read", post.reading_time);
        assert_eq!(None, post.cover_image);
        assert_eq!("# Heading\n\nFirst *paragraph*.\n\nSecond.\n", post.body);
        Ok(())
    }

    #[test]
    fn test_parse_post_rfc3339_date() -> Result<()> {
        let input = "---\ntitle: T\ndate: \"2026-01-20T09:30:00Z\"\ncategory: Integration\n---\n";
        let post = parse_post_str("t", input)?;
        assert_eq!(NaiveDate::from_ymd_opt(2026, 1, 20), Some(post.date));
        Ok(())
    }

    #[test]
    fn test_frontmatter_indices() -> Result<()> {
        let input = "---\ntitle: a---b\n---\nbody";
        let (start, stop, body) = frontmatter_indices(input)?;
        assert_eq!("title: a---b\n", &input[start..stop]);
        assert_eq!("body", &input[body..]);
        Ok(())
    }

    #[test]
    fn test_missing_fences() {
        assert!(matches!(
            parse_post_str("x", "title: nope\n"),
            Err(Error::FrontmatterMissingStartFence)
        ));
        assert!(matches!(
            parse_post_str("x", "---\ntitle: nope\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }

    #[test]
    fn test_missing_required_fields() {
        let cases = [
            ("---\ndate: 2026-01-01\ncategory: C\n---\n", "title"),
            ("---\ntitle: T\ncategory: C\n---\n", "date"),
            ("---\ntitle: T\ndate: 2026-01-01\n---\n", "category"),
            ("---\ntitle: T\ndate: 2026-01-01\ncategory: \"  \"\n---\n", "category"),
        ];
        for (input, wanted) in cases {
            match parse_post_str("x", input) {
                Err(Error::MissingField(field)) => assert_eq!(wanted, field),
                other => panic!("wanted missing `{}`; found {:?}", wanted, other),
            }
        }
    }

    #[test]
    fn test_invalid_date() {
        let input = "---\ntitle: T\ndate: 2026-02-30\ncategory: C\n---\n";
        assert!(matches!(
            parse_post_str("x", input),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_bad_record_fails_whole_load() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "good.md", "---\ntitle: G\ndate: 2026-01-01\ncategory: C\n---\n")?;
        write(dir.path(), "bad.md", "---\ntitle: B\ndate: 2026-01-01\n---\n")?;

        let err = Parser::new(dir.path()).parse_posts().unwrap_err();
        assert!(matches!(err, Error::Annotated(..)));
        assert!(matches!(err.root(), Error::MissingField("category")));
        assert!(err.to_string().contains("bad.md"));
        assert!(!err.to_string().contains("category"));
        Ok(())
    }

    #[test]
    fn test_duplicate_slug() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let post = "---\ntitle: A\ndate: 2026-01-01\ncategory: C\n---\n";
        write(dir.path(), "a.md", post)?;
        write(dir.path(), "a.mdx", post)?;

        let err = Parser::new(dir.path()).parse_posts().unwrap_err();
        assert!(matches!(err.root(), Error::DuplicateSlug(slug) if slug == "a"));
        Ok(())
    }

    #[test]
    fn test_same_day_posts_keep_file_name_order() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["c.md", "a.mdx", "b.md"] {
            write(dir.path(), name, "---\ntitle: T\ndate: 2026-01-01\ncategory: C\n---\n")?;
        }
        write(dir.path(), "z.md", "---\ntitle: T\ndate: 2026-03-01\ncategory: C\n---\n")?;
        write(dir.path(), "notes.txt", "not a post")?;
        fs::create_dir(dir.path().join("drafts.md"))?;

        let posts = Parser::new(dir.path()).parse_posts().unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(vec!["z", "a", "b", "c"], slugs);
        Ok(())
    }

    #[test]
    fn test_empty_directory() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(Parser::new(dir.path()).parse_posts().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let err = Parser::new(Path::new("./testdata/does-not-exist"))
            .parse_posts()
            .unwrap_err();
        assert!(matches!(err.root(), Error::Io(_)));
    }
}
