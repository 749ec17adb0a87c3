/// Duration applied to drafts that don't specify one.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Key under which the serialized event list is persisted.
pub const EVENTS_KEY: &str = "calendarEvents";

/// How often the reminder poll sweeps the store.
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_HOLIDAY_COUNTRY: &str = "IN";

pub const DEFAULT_DATA_DIR: &str = "~/.local/share/agenda";
