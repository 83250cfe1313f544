pub const DEFAULT_SIZE_PX: u32 = 32;
pub const DEFAULT_GAMMA: f32 = 1.8;
pub const DEFAULT_MITER_LIMIT: f32 = 4.0;

pub const CONFIG_DIR_NAME: &str = "ftpix";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Preview ramp from empty to full coverage.
pub const PREVIEW_SHADES: &[u8] = b" .:-=+*#%@";
