// doc constants
pub const DOC_ID: &str = "_id";
pub const FIELD_SEPARATOR: &str = ".";

// operator wire form constants
pub const CMD_TAG: &str = "__cmd";
pub const CMD_CONDITIONS: &str = "conditions";
pub const CMD_VALUES: &str = "values";
pub const CMD_VALUE: &str = "value";
pub const CMD_FLAG: &str = "flag";
pub const CMD_REGEXP: &str = "regexp";
pub const CMD_OPTIONS: &str = "options";

// config defaults
pub const DEFAULT_ID_PREFIX: &str = "mock-";
pub const DEFAULT_FILE_ID_SCHEME: &str = "mock://";
pub const DEFAULT_TEMP_URL_BASE: &str = "https://mock/";
pub const FILE_KEY_PREFIX: &str = "file-";

// temp url status codes
pub const STATUS_OK: i64 = 0;
pub const STATUS_NOT_FOUND: i64 = -1;
