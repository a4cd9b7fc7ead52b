//! Core business logic modules

pub mod dates;
pub mod filter;
pub mod identity;
pub mod kelly;
pub mod staking;

// Re-export commonly used types
pub use dates::{parse_date_with_hint, parse_flexible_date, DateFormat, DateParseError};
pub use filter::{FilterableRecord, RecordFilter, Timeframe, WindowAnchor};
pub use identity::MatchId;
pub use kelly::{calculate_kelly_fraction, KellySizing};
pub use staking::StakingPolicy;
