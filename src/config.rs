use log::LevelFilter;

/*
    Central place for application configuration until we decide on a non-hardcode method
 */

// Info would interleave log lines with the displayed notes, override with --log-level
pub const LOG_LEVEL: LevelFilter = LevelFilter::Warn;

pub const DEFAULT_INTERVAL_SECONDS: i64 = 10;
pub const DEFAULT_INTERVAL_MS: u64 = 10000;

// "US" = Microseconds
pub const TICK_TIME_US: u64 = 4000; // 4ms

// Host -> timer thread messages; senders wait for room once it is full
pub const COMMAND_QUEUE_CAPACITY: usize = 32;

pub const START_PROMPT: &str = "Select An Option to Start";
pub const COMPLETION_MESSAGE: &str = "All Notes Displayed!";
