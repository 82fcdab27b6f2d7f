//! Web content extraction adapters

pub mod firecrawl;
pub mod stub;

pub use firecrawl::FirecrawlSource;
pub use stub::StubSource;
