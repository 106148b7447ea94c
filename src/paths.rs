use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

const CONFIG_FILE: &str = "config.json";

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the log file: `<exe_dir>/logs/uo_mod_ocr.log`
pub fn get_log_file() -> PathBuf {
    get_logs_dir().join("uo_mod_ocr.log")
}

/// Returns the config file path.
///
/// `<exe_dir>/config.json` if present, otherwise
/// `<user config dir>/uo-mod-ocr/config.json`.
pub fn get_config_path() -> PathBuf {
    let local = get_exe_dir().join(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("uo-mod-ocr").join(CONFIG_FILE))
        .unwrap_or(local)
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}
