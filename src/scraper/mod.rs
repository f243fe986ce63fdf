pub mod firecrawl;
pub mod traits;

pub use firecrawl::{FirecrawlClient, DEFAULT_BASE_URL};
pub use traits::ProductSource;
