//! Attaches cover images to posts. An image belongs to the post whose slug
//! equals the image's file stem (`aave-v4.jpg` → `aave-v4.mdx`); attaching it
//! appends a `coverImage` field to the post's frontmatter. Posts that already
//! have a cover are never rewritten.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::parser::{frontmatter_indices, is_post_file};

/// File extensions recognized as cover images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// The frontmatter key holding a post's cover image.
const COVER_KEY: &str = "coverImage:";

/// What happened to a single post file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoverOutcome {
    /// `coverImage` was added, pointing at `image`.
    Attached { slug: String, image: String },

    /// The post already had a `coverImage`; the file was left untouched.
    AlreadySet { slug: String },

    /// No image matches the post's slug.
    NoImage { slug: String },

    /// The post file has no frontmatter to patch.
    MissingFrontmatter { slug: String },
}

/// The result of patching one post file's contents.
#[derive(Debug, PartialEq, Eq)]
pub enum Patch {
    Updated(String),
    AlreadySet,
    MissingFrontmatter,
}

/// Appends `coverImage: "{image}"` as the last line of the frontmatter in
/// `input`, unless the frontmatter already has a top-level `coverImage` key.
pub fn insert_cover(input: &str, image: &str) -> Patch {
    let (yaml_start, yaml_stop, _) = match frontmatter_indices(input) {
        Ok(indices) => indices,
        Err(_) => return Patch::MissingFrontmatter,
    };
    let yaml = &input[yaml_start..yaml_stop];
    if yaml.lines().any(|line| line.starts_with(COVER_KEY)) {
        return Patch::AlreadySet;
    }

    let newline = if input[..yaml_start].ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    };
    let escaped = image.replace('\\', "\\\\").replace('"', "\\\"");

    let mut out = String::with_capacity(input.len() + escaped.len() + 16);
    out.push_str(&input[..yaml_stop]);
    out.push_str(&format!("{} \"{}\"{}", COVER_KEY, escaped, newline));
    out.push_str(&input[yaml_stop..]);
    Patch::Updated(out)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Lists the regular files directly inside `dir` that satisfy `keep`, in
/// file-name order.
fn files_in(dir: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for result in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = result?;
        if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

/// Maps image stems to image file names. When several images share a stem
/// the first in file-name order wins.
fn images_by_slug(images_directory: &Path) -> Result<HashMap<String, String>> {
    let mut images = HashMap::new();
    if !images_directory.is_dir() {
        warn!(directory = %images_directory.display(), "no images directory");
        return Ok(images);
    }
    for path in files_in(images_directory, is_image_file)? {
        if let (Some(stem), Some(name)) = (
            file_stem(&path),
            path.file_name().and_then(|name| name.to_str()),
        ) {
            images
                .entry(stem.to_owned())
                .or_insert_with(|| name.to_owned());
        }
    }
    Ok(images)
}

/// Attaches images from `images_directory` to the posts in
/// `content_directory`. `images_url` is the prefix written in front of the
/// image file name (e.g. `/images/blog/`). Returns one [`CoverOutcome`] per
/// post file, in file-name order.
pub fn attach_covers(
    content_directory: &Path,
    images_directory: &Path,
    images_url: &str,
) -> Result<Vec<CoverOutcome>> {
    if !content_directory.is_dir() {
        return Err(Error::MissingDirectory(content_directory.to_owned()));
    }
    let images = images_by_slug(images_directory)?;
    let posts = files_in(content_directory, is_post_file)?;
    info!(posts = posts.len(), images = images.len(), "attaching covers");

    let mut outcomes = Vec::with_capacity(posts.len());
    for path in posts {
        let slug = match file_stem(&path) {
            Some(slug) => slug.to_owned(),
            None => continue,
        };
        let file = match images.get(&slug) {
            Some(file) => file,
            None => {
                warn!(%slug, "no image found");
                outcomes.push(CoverOutcome::NoImage { slug });
                continue;
            }
        };

        let image = format!("{}{}", images_url, file);
        let contents = fs::read_to_string(&path).map_err(|err| Error::Io {
            path: path.clone(),
            err,
        })?;
        outcomes.push(match insert_cover(&contents, &image) {
            Patch::Updated(updated) => {
                fs::write(&path, updated).map_err(|err| Error::Io {
                    path: path.clone(),
                    err,
                })?;
                info!(%slug, %image, "attached cover");
                CoverOutcome::Attached { slug, image }
            }
            Patch::AlreadySet => {
                debug!(%slug, "cover already set");
                CoverOutcome::AlreadySet { slug }
            }
            Patch::MissingFrontmatter => {
                warn!(%slug, "no frontmatter found");
                CoverOutcome::MissingFrontmatter { slug }
            }
        });
    }
    Ok(outcomes)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error attaching covers.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the content directory doesn't exist.
    #[error("content directory '{}' not found", .0.display())]
    MissingDirectory(PathBuf),

    /// Returned when a directory can't be listed.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Returned when a post file can't be read or written.
    #[error("'{}': {err}", path.display())]
    Io { path: PathBuf, err: std::io::Error },
}

#[cfg(test)]
mod test {
    use super::*;

    const POST: &str = "---\ntitle: A\ndate: 2026-01-05\ncategory: Integration\n---\nBody.\n";

    #[test]
    fn test_insert_cover() {
        assert_eq!(
            Patch::Updated(String::from(
                "---\ntitle: A\ndate: 2026-01-05\ncategory: Integration\n\
                 coverImage: \"/images/blog/a.jpg\"\n---\nBody.\n"
            )),
            insert_cover(POST, "/images/blog/a.jpg")
        );
    }

    #[test]
    fn test_insert_cover_keeps_crlf() {
        let input = "---\r\ntitle: A\r\n---\r\nBody";
        assert_eq!(
            Patch::Updated(String::from("---\r\ntitle: A\r\ncoverImage: \"/a.png\"\r\n---\r\nBody")),
            insert_cover(input, "/a.png")
        );
    }

    #[test]
    fn test_insert_cover_skips() {
        let input = "---\ntitle: A\ncoverImage: \"/old.jpg\"\n---\n";
        assert_eq!(Patch::AlreadySet, insert_cover(input, "/new.jpg"));
        assert_eq!(Patch::MissingFrontmatter, insert_cover("just text", "/new.jpg"));
    }

    #[test]
    fn test_attach_covers() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let content = root.path().join("content");
        let images = root.path().join("images");
        fs::create_dir_all(&content)?;
        fs::create_dir_all(&images)?;

        fs::write(content.join("a.mdx"), POST)?;
        fs::write(content.join("b.md"), "---\ntitle: B\ncoverImage: \"/x.jpg\"\n---\n")?;
        fs::write(content.join("c.md"), POST)?;
        fs::write(content.join("d.md"), "no frontmatter")?;
        fs::write(content.join("notes.txt"), "ignored")?;
        fs::write(images.join("a.JPG"), b"")?;
        fs::write(images.join("a.png"), b"")?;
        fs::write(images.join("b.webp"), b"")?;
        fs::write(images.join("d.jpeg"), b"")?;
        fs::write(images.join("c.gif"), b"")?;

        let outcomes = attach_covers(&content, &images, "/images/blog/")?;
        assert_eq!(
            vec![
                CoverOutcome::Attached {
                    slug: String::from("a"),
                    image: String::from("/images/blog/a.JPG"),
                },
                CoverOutcome::AlreadySet { slug: String::from("b") },
                CoverOutcome::NoImage { slug: String::from("c") },
                CoverOutcome::MissingFrontmatter { slug: String::from("d") },
            ],
            outcomes
        );

        let patched = fs::read_to_string(content.join("a.mdx"))?;
        let post = crate::parser::parse_post_str("a", &patched)?;
        assert_eq!(Some("/images/blog/a.JPG"), post.cover_image.as_deref());
        assert_eq!(POST, fs::read_to_string(content.join("c.md"))?);

        // running again changes nothing
        let outcomes = attach_covers(&content, &images, "/images/blog/")?;
        assert_eq!(CoverOutcome::AlreadySet { slug: String::from("a") }, outcomes[0]);
        Ok(())
    }

    #[test]
    fn test_missing_images_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        fs::write(root.path().join("a.md"), POST)?;
        let outcomes = attach_covers(root.path(), &root.path().join("nope"), "/i/")?;
        assert_eq!(vec![CoverOutcome::NoImage { slug: String::from("a") }], outcomes);
        Ok(())
    }

    #[test]
    fn test_missing_content_directory() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            attach_covers(&root.path().join("nope"), root.path(), "/i/"),
            Err(Error::MissingDirectory(_))
        ));
    }
}
