//! Configuration module

mod site;

pub use site::IndexConfig;
pub use site::SiteConfig;
