use crate::error::StorageError;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

/// Default time a `tf` invocation waits for another one to finish writing.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Copy)]
enum LockKind {
    Shared,
    Exclusive,
}

#[derive(Debug)]
struct FileGuard {
    file: File,
    path: PathBuf,
}

impl FileGuard {
    fn acquire(path: &Path, timeout: Duration, kind: LockKind) -> Result<Self, StorageError> {
        let io_err = |source: io::Error| StorageError::Write {
            path: path.to_path_buf(),
            source,
        };

        let parent = path.parent().ok_or_else(|| {
            io_err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "lock path has no parent",
            ))
        })?;
        fs::create_dir_all(parent).map_err(io_err)?;

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)
                .map_err(io_err)?;

            let contended = match kind {
                LockKind::Shared => FileExt::try_lock_shared(&file).is_err(),
                LockKind::Exclusive => FileExt::try_lock_exclusive(&file).is_err(),
            };

            if !contended {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            if start.elapsed() >= timeout {
                return Err(StorageError::LockTimeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// RAII guard for the exclusive lock held while the storage document is rewritten.
#[derive(Debug)]
pub struct StorageWriteLock {
    guard: FileGuard,
}

impl StorageWriteLock {
    /// Acquire an exclusive advisory lock on the lock path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LockTimeout`] if another holder keeps the lock
    /// past `timeout`, or [`StorageError::Write`] if the lock file cannot be
    /// created.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, StorageError> {
        Ok(Self {
            guard: FileGuard::acquire(path, timeout, LockKind::Exclusive)?,
        })
    }

    /// Return the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.guard.path
    }
}

/// RAII guard for a shared read of the storage document.
#[derive(Debug)]
pub struct StorageReadLock {
    guard: FileGuard,
}

impl StorageReadLock {
    /// Acquire a shared advisory lock on the lock path.
    ///
    /// # Errors
    ///
    /// Same as [`StorageWriteLock::acquire`].
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, StorageError> {
        Ok(Self {
            guard: FileGuard::acquire(path, timeout, LockKind::Shared)?,
        })
    }

    /// Return the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.guard.path
    }
}

#[cfg(test)]
mod tests {
    use super::{StorageReadLock, StorageWriteLock};
    use crate::error::{ErrorCode, StorageError};
    use std::{
        path::PathBuf,
        sync::{Arc, Barrier},
        thread,
        time::Duration,
    };

    fn lock_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("ticketflow_lock_tests_{}", std::process::id()));
        path.push(name);
        path
    }

    #[test]
    fn write_lock_allows_acquire_and_release() -> Result<(), StorageError> {
        let path = lock_path("basic.lock");
        let lock = StorageWriteLock::acquire(&path, Duration::from_millis(50))?;
        assert_eq!(lock.path(), path.as_path());
        drop(lock);
        Ok(())
    }

    #[test]
    fn write_lock_times_out_when_held() {
        let path = lock_path("timeout.lock");
        let _guard =
            StorageWriteLock::acquire(&path, Duration::from_millis(50)).expect("first lock");
        let err = StorageWriteLock::acquire(&path, Duration::from_millis(20))
            .expect_err("second lock must time out");

        assert!(matches!(err, StorageError::LockTimeout { path: ref p, .. } if *p == path));
        assert_eq!(err.code(), ErrorCode::LockContention);
    }

    #[test]
    fn read_locks_are_compatible() -> Result<(), StorageError> {
        let path = lock_path("read-share.lock");
        let first = StorageReadLock::acquire(&path, Duration::from_millis(50))?;
        let second = StorageReadLock::acquire(&path, Duration::from_millis(50))?;
        assert_eq!(first.path(), second.path());
        Ok(())
    }

    #[test]
    fn writer_blocks_readers() {
        let path = lock_path("write-blocks-read.lock");
        let _write =
            StorageWriteLock::acquire(&path, Duration::from_millis(50)).expect("write lock");

        let started = std::time::Instant::now();
        let read = StorageReadLock::acquire(&path, Duration::from_millis(20));

        assert!(matches!(read, Err(StorageError::LockTimeout { .. })));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn contention_is_resolved_after_writer_releases() -> Result<(), StorageError> {
        let path = lock_path("thread.lock");

        let blocker = Arc::new(Barrier::new(2));
        let waiter = Arc::new(Barrier::new(2));

        let blocker_thread = Arc::clone(&blocker);
        let waiter_thread = Arc::clone(&waiter);
        let path_in_thread = path.clone();
        let handle = thread::spawn(move || {
            let _writer = StorageWriteLock::acquire(&path_in_thread, Duration::from_millis(200))
                .expect("writer lock");
            blocker_thread.wait();
            waiter_thread.wait();
        });

        blocker.wait();
        assert!(matches!(
            StorageReadLock::acquire(&path, Duration::from_millis(20)),
            Err(StorageError::LockTimeout { .. })
        ));
        waiter.wait();
        handle.join().expect("writer thread");

        let _reader = StorageReadLock::acquire(&path, Duration::from_millis(200))?;
        Ok(())
    }
}
