use std::{
    path::Path,
    sync::{Mutex, MutexGuard, OnceLock},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Sets environment variables for one test and restores them on drop.
pub struct XaiboardEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl XaiboardEnvGuard {
    pub fn new() -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        Self {
            previous: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set_config_home(self, path: &Path) -> Self {
        self.set("XAIBOARD_CONFIG_HOME", Some(&path.to_string_lossy()))
    }

    pub fn set(mut self, key: &'static str, value: Option<&str>) -> Self {
        self.previous.push((key, std::env::var(key).ok()));
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
        self
    }
}

impl Drop for XaiboardEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
