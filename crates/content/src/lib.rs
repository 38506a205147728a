//! # Content Crate
//!
//! The content shapes the catalog renders, and how to read them.
//!
//! ## Main Components
//!
//! - **types**: Item variants (Model, Image, Article, User, Collection,
//!   Bounty, Post), rating flags, ingestion status, `ContentType` and
//!   `ContentList`
//! - **parser**: JSON loading for list documents
//! - **error**: Error types for content loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use content::{load_content_list, ContentType};
//! use std::path::Path;
//!
//! let list = load_content_list(ContentType::Models, Path::new("feed/models.json"))?;
//! println!("{} {}", list.len(), list.content_type());
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::{ContentError, Result};
pub use parser::{load_content_list, parse_content_list, read_json};
pub use types::{
    // Type aliases
    ArticleId,
    BountyId,
    BrowsingLevel,
    CollectionId,
    ImageId,
    ModelId,
    PostId,
    TagId,
    UserId,
    // Item variants
    Article,
    Bounty,
    Collection,
    Image,
    Model,
    Post,
    User,
    // Nested shapes
    ImageRef,
    ModelImage,
    NestedImage,
    OwnerRef,
    TagRef,
    // Lists and ratings
    ContentList,
    ContentType,
    IngestionStatus,
    NsfwLevel,
};
