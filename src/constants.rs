// Central economic constants and limits.
pub const STARTING_CREDITS: i64 = 2;
pub const REFERRAL_REWARD: i64 = 1;
pub const LOOKUP_COST: i64 = 1;
// Queries shorter than this are treated as stray text, not lookups.
pub const MIN_QUERY_DIGITS: usize = 10;
pub const LOOKUP_TIMEOUT_SECS: u64 = 15;
