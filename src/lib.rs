//! The library code for the `journal` content engine. The architecture can be
//! generally broken down into three steps:
//!
//! 1. Loading posts from source files on disk ([`crate::parser`])
//! 2. Deriving views over the loaded posts ([`crate::index`] and
//!    [`crate::filter`])
//! 3. Rendering those views as text ([`crate::render`])
//!
//! The first step is the only fallible one: a post source file is a YAML
//! frontmatter block followed by a Markdown body, and a single malformed file
//! fails the whole load. Everything after that is a pure function of the
//! loaded posts.
//!
//! The second step produces two groupings. The category grouping backs the
//! archive's category cards and the journal grid's filter bar; the year/month
//! grouping backs the archive timeline. Both preserve the loader's
//! newest-first order inside every bucket.
//!
//! Separately, [`crate::cover`] patches post source files in place to attach
//! cover images that were generated for them.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod cover;
pub mod filter;
pub mod index;
pub mod logging;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod render;
