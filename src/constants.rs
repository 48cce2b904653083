/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const CHAT_ENDPOINT: &str = "/api/chat";
pub const KEY_INFO_ENDPOINT: &str = "/api/key-info";
pub const HEALTH_ENDPOINT: &str = "/api/health";

// Timeouts
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 3;

// Models
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const GEMINI_PRO: &str = "gemini-2.5-pro";
pub const GEMINI_FLASH: &str = "gemini-2.5-flash";

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_PAGE_LINES: u16 = 10;

// Timeline notifications
pub const TIMELINE_EVENT_CAPACITY: usize = 64;

// Fallback detail when the backend reports failure without an error field
pub const UNKNOWN_ERROR_DETAIL: &str = "unknown error";
