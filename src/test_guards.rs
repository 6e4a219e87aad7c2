//! Guards for process-global state in tests.
//!
//! Config and session files are resolved against the working directory, and
//! the API origin can come from the environment. Tests touching either must
//! be `#[serial]`; the guards put things back even when the test panics.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Runs the test inside a fresh temporary directory.
pub struct Workdir {
    original: PathBuf,
    dir: TempDir,
}

impl Workdir {
    pub fn enter() -> std::io::Result<Self> {
        let original = env::current_dir()?;
        let dir = TempDir::new()?;
        env::set_current_dir(dir.path())?;
        Ok(Self { original, dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for Workdir {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

/// Restores an environment variable's previous value (or absence) on drop.
pub struct EnvGuard {
    key: &'static str,
    original: Option<OsString>,
}

impl EnvGuard {
    /// # Safety
    /// Calls `std::env::set_var`; the test must be `#[serial]`.
    pub unsafe fn set(key: &'static str, value: &str) -> Self {
        let original = env::var_os(key);
        unsafe { env::set_var(key, value) };
        Self { key, original }
    }

    /// # Safety
    /// Calls `std::env::remove_var`; the test must be `#[serial]`.
    pub unsafe fn remove(key: &'static str) -> Self {
        let original = env::var_os(key);
        unsafe { env::remove_var(key) };
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: guarded tests run serially.
        match &self.original {
            Some(val) => unsafe { env::set_var(self.key, val) },
            None => unsafe { env::remove_var(self.key) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_workdir_restores_on_drop() {
        let original = env::current_dir().unwrap();
        {
            let work = Workdir::enter().unwrap();
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                work.path().canonicalize().unwrap()
            );
        }
        assert_eq!(env::current_dir().unwrap(), original);
    }

    #[test]
    #[serial]
    fn test_env_guard_restores_absent_var() {
        let key = "OPSDESK_TEST_GUARD_ABSENT";
        unsafe { env::remove_var(key) };
        {
            let _guard = unsafe { EnvGuard::set(key, "temporary") };
            assert_eq!(env::var(key).unwrap(), "temporary");
        }
        assert!(env::var(key).is_err());
    }
}
