//! Post metadata: model, front-matter parsing and the post store

mod frontmatter;
mod post;
mod store;

pub use frontmatter::FrontMatter;
pub use post::Post;
pub use store::{PostStore, StoreError};
