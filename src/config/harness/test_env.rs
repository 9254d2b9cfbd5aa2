use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(super) const HARNESS_VARS: [&str; 4] = [
    "VALPARITY_API_GROUP",
    "VALPARITY_API_VERSIONS",
    "VALPARITY_THREE_POINT",
    "VALPARITY_REPORT_DIR",
];

/// Serializes env-mutating tests; a failed test must not wedge the rest.
pub(super) fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(super) struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvVarGuard {
    pub(super) fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: test-only; callers hold `env_lock()`.
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, previous }
    }

    pub(super) fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: test-only; callers hold `env_lock()`.
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, previous }
    }

    /// Clears every `VALPARITY_*` variable until the guards drop.
    pub(super) fn clear_harness_vars() -> Vec<Self> {
        HARNESS_VARS.into_iter().map(Self::unset).collect()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: test-only; the enclosing test still holds `env_lock()`.
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}
