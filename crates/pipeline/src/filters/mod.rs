//! Filter implementations, one per content type.
//!
//! Each filter can be registered in a `VisibilityPipeline`.

pub mod articles;
pub mod bounties;
pub mod collections;
pub mod images;
pub mod models;
pub mod posts;
mod rules;
pub mod users;

// Re-export for convenience
pub use articles::ArticleFilter;
pub use bounties::BountyFilter;
pub use collections::CollectionFilter;
pub use images::ImageFilter;
pub use models::ModelFilter;
pub use posts::PostFilter;
pub use users::UserFilter;
