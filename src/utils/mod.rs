mod hash;

pub use hash::compute_hash;

use std::path::{Path, PathBuf};

/// Default name of the configuration file, looked up beside the executable
pub const CONFIG_FILE_NAME: &str = "backupUtil.cfg";

/// Branch written to when the configuration does not name one
pub const DEFAULT_BRANCH: &str = "master";

/// Default per-request timeout for the remote API, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Get the path of `file_name` inside the directory holding the running executable
pub fn get_exe_relative_path(file_name: &str) -> Result<PathBuf, std::io::Error> {
    let exe_path = std::env::current_exe()?;
    let exe_dir = exe_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(exe_dir.join(file_name))
}
