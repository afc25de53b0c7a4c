use log::{Level, warn};
use once_cell::sync::OnceCell;

const DEFAULT_LEVEL: Level = Level::Info;

static LOGGER: OnceCell<Level> = OnceCell::new();

/// Routes `log` records and panics to the browser console.
/// Only the first call has an effect; the active level is returned.
pub fn init(level: Option<&str>) -> Level {
    *LOGGER.get_or_init(|| {
        console_error_panic_hook::set_once();

        let parsed = parse_level(level);
        let active = parsed.unwrap_or(DEFAULT_LEVEL);
        // Fails only when the host already installed a logger.
        let _ = console_log::init_with_level(active);

        if parsed.is_none()
            && let Some(raw) = level
        {
            warn!("unknown log level {raw:?}, using {DEFAULT_LEVEL}");
        }
        active
    })
}

/// `None` for an unrecognized level name. A missing name means the default.
pub fn parse_level(level: Option<&str>) -> Option<Level> {
    match level {
        None => Some(DEFAULT_LEVEL),
        Some(raw) => raw.trim().parse().ok(),
    }
}
