//! External search services
//!
//! Provides:
//! - Knowledge-base similarity search via Elasticsearch kNN
//! - Web search via DuckDuckGo

mod duckduckgo;
mod elasticsearch;
mod traits;

pub use duckduckgo::DuckDuckGoSearch;
pub use elasticsearch::{ElasticsearchStore, IndexDocument};
pub use traits::*;
