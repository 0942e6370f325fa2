//! Constants used throughout valuekit

/// Environment variable overriding the preferences directory
pub const PREFS_DIR_ENV: &str = "VALUEKIT_PREFS_DIR";

/// Sub-directory created inside the platform preference directory
pub const PREFS_SUBDIR: &str = "valuekit";

/// Suffix of in-progress files renamed onto their final path
pub const WORKING_SUFFIX: &str = ".working";

/// Inserted between the file stem and extension of backup copies
pub const BACKUP_SUFFIX: &str = " backup";

/// Scheme added to URLs without one
pub const DEFAULT_URL_SCHEME: &str = "http";

/// Property-list spelling of booleans
pub const PLIST_TRUE: &str = "YES";
pub const PLIST_FALSE: &str = "NO";

/// Date formats (strftime)
pub mod date_formats {
    pub const SHORT_DATE: &str = "%-m/%-d/%y";
    pub const MEDIUM_DATE: &str = "%b %-d, %Y";
    pub const LONG_DATE: &str = "%B %-d, %Y";
    pub const FULL_DATE: &str = "%A, %B %-d, %Y";
    pub const SHORT_TIME: &str = "%-I:%M %p";
    pub const MEDIUM_TIME: &str = "%-I:%M:%S %p";
    pub const LONG_TIME: &str = "%-I:%M:%S %p %Z";
    pub const DESCRIPTION_DATE_TIME: &str = "%Y-%m-%d %H:%M";
    pub const DESCRIPTION_DATE: &str = "%Y-%m-%d";
    pub const DESCRIPTION_TIME: &str = "%H:%M:%S";
    pub const NUMERIC_DATE_TIME: &str = "%Y-%m-%d %H:%M:%S %z";
    pub const NUMERIC_DATE: &str = "%Y-%m-%d";
}

/// Relative day names used by relative date formatting
pub mod relative_days {
    pub const TODAY: &str = "Today";
    pub const YESTERDAY: &str = "Yesterday";
    pub const TOMORROW: &str = "Tomorrow";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
