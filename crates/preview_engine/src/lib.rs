//! Preview engine: fetching, extraction, caching and the page activation loop.
mod cache;
mod clock;
mod decode;
mod engine;
mod extract;
mod fetch;
mod file_cache;
mod host;
mod live;
mod persist;
mod pipeline;
mod scan;
mod settings;
mod status;
mod types;
mod watcher;

pub use cache::{CacheStore, MemoryCacheStore, PreviewEntry, StoreError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use decode::{decode_body, DecodeError, DecodePolicy, DecodedBody};
pub use engine::{EngineContext, EngineError, EngineHandle, PageActivation, PageActivator};
pub use extract::{
    ArticleExtractor, ExtractError, ExtractLimits, Extractor, ExtractorRegistry, FeedExtractor,
    TopicExtractor,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use file_cache::FileCacheStore;
pub use host::{HostError, PageHost, PreviewSurface, ReadyState, StaticPageHost};
pub use live::{SessionBinding, SharedSession};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use pipeline::PreviewFetcher;
pub use scan::PageScanner;
pub use settings::PreviewSettings;
pub use status::{clear_cache, report_cache_size, scale_size};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, PreviewError, PreviewOutcome,
};
pub use watcher::poll_location;
