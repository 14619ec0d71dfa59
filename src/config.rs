//! Loads the `journal.yaml` project file. The file is searched for from a
//! starting directory upward through its ancestors, and every path inside it
//! is resolved against the directory containing it.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// The name of the project file.
pub const PROJECT_FILE: &str = "journal.yaml";

fn default_content_directory() -> PathBuf {
    PathBuf::from("content/blog")
}

fn default_images_directory() -> PathBuf {
    PathBuf::from("public/images/blog")
}

fn default_images_url() -> String {
    String::from("/images/blog/")
}

fn default_site_root() -> Url {
    // a literal, always parses
    Url::parse("http://localhost:3000/").unwrap()
}

fn default_categories() -> Vec<String> {
    ["Protocol Updates", "Integration", "Case Studies", "Regulatory"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default = "default_images_directory")]
    images_directory: PathBuf,

    #[serde(default = "default_images_url")]
    images_url: String,

    #[serde(default = "default_site_root")]
    site_root: Url,

    #[serde(default = "default_categories")]
    categories: Vec<String>,
}

/// Resolved project configuration.
#[derive(Debug, PartialEq)]
pub struct Config {
    /// Where post source files live.
    pub content_directory: PathBuf,

    /// Where cover images live.
    pub images_directory: PathBuf,

    /// The site-relative URL prefix written into `coverImage` fields.
    pub images_url: String,

    /// The site's base URL; post links are `{site_root}blog/{slug}`.
    pub site_root: Url,

    /// The categories offered in the filter bar, in display order.
    pub categories: Vec<String>,
}

impl Config {
    /// Finds [`PROJECT_FILE`] in `dir` or the nearest ancestor that has one
    /// and loads it.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(Error::NotFound),
            }
        }
    }

    /// Loads the project file at `path`.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project =
            serde_yaml::from_str(&contents).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            })?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));

        let mut images_url = project.images_url;
        if !images_url.ends_with('/') {
            images_url.push('/');
        }

        Ok(Config {
            content_directory: root.join(project.content_directory),
            images_directory: root.join(project.images_directory),
            images_url,
            site_root: project.site_root,
            categories: project.categories,
        })
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for loading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when no ancestor directory holds a project file.
    #[error("Could not find `journal.yaml` in any parent directory")]
    NotFound,

    /// Returned for I/O problems opening the project file.
    #[error("Opening project file '{}': {err}", path.display())]
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML for a [`Config`].
    #[error("Loading configuration '{}': {err}", path.display())]
    Parse { path: PathBuf, err: serde_yaml::Error },
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn test_defaults() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "{}\n")?;

        let config = Config::from_project_file(&dir.path().join(PROJECT_FILE))?;
        assert_eq!(dir.path().join("content/blog"), config.content_directory);
        assert_eq!(dir.path().join("public/images/blog"), config.images_directory);
        assert_eq!("/images/blog/", config.images_url);
        assert_eq!("http://localhost:3000/", config.site_root.as_str());
        assert_eq!(default_categories(), config.categories);
        Ok(())
    }

    #[test]
    fn test_found_in_ancestor() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "content_directory: posts\nimages_url: /covers\nsite_root: https://example.com/\ncategories: [Integration]\n",
        )?;
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(dir.path().join("posts"), config.content_directory);
        assert_eq!("/covers/", config.images_url);
        assert_eq!("https://example.com/", config.site_root.as_str());
        assert_eq!(vec![String::from("Integration")], config.categories);
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(PROJECT_FILE);
        fs::write(&path, "categories: 7\n")?;
        assert!(matches!(
            Config::from_project_file(&path),
            Err(Error::Parse { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("./testdata/missing/journal.yaml");
        assert!(matches!(
            Config::from_project_file(path),
            Err(Error::Open { .. })
        ));
    }
}
