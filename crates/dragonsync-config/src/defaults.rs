//! Baseline values applied when a field is absent from the config file.
//!
//! # Design
//! - Keep every default in one place so the CLI help and docs stay consistent.
//! - Endpoints point at the public Data Dragon and `CommunityDragon` CDNs.

/// Per-request timeout for asset and catalog downloads.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Delay between consecutive fetch launches.
pub const DISPATCH_SPACING_MS: u64 = 0;
/// Capacity of the result channel between fetchers and the sink.
pub const CHANNEL_CAPACITY: usize = 64;
/// Base URL of the Data Dragon CDN.
pub const DDRAGON_BASE: &str = "https://ddragon.leagueoflegends.com";
/// Base URL of the `CommunityDragon` CDN.
pub const COMMUNITY_BASE: &str = "https://cdn.communitydragon.org";
/// Locale used for catalog documents.
pub const LOCALE: &str = "en_US";
/// Directory that receives the versioned asset tree.
pub const OUTPUT_ROOT: &str = "assets";
/// Default log level when `RUST_LOG` is unset.
pub const LOG_LEVEL: &str = "info";
/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("dragonsync/", env!("CARGO_PKG_VERSION"));
/// Catalog name whose icon is published under a different spelling.
pub const FIDDLESTICKS: &str = "Fiddlesticks";
/// Spelling the remaining Fiddlesticks assets are published under.
pub const FIDDLESTICKS_CORRECTED: &str = "FiddleSticks";
