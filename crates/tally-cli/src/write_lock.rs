//! Single-writer guard for a project's trail.
//!
//! Mutating commands hold `.tally/write.lock` (containing the holder's pid)
//! for their whole run so two processes never append to the trail at once.
//! A lock whose pid is no longer alive is reclaimed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tally_config::PROJECT_DIR;

const LOCK_FILE: &str = "write.lock";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Removes the lock file on drop.
#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[must_use]
pub fn lock_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(LOCK_FILE)
}

/// Wait (up to five minutes) for the project's write lock.
pub async fn acquire_for_project(project_root: &Path) -> anyhow::Result<WriteLockGuard> {
    acquire(&lock_path(project_root), LOCK_WAIT_TIMEOUT).await
}

async fn acquire(path: &Path, timeout: Duration) -> anyhow::Result<WriteLockGuard> {
    let started = Instant::now();
    loop {
        let holder = match try_acquire(path) {
            Ok(guard) => return Ok(guard),
            Err(Holder::Dead) => {
                tracing::warn!(path = %path.display(), "removing stale write lock");
                let _ = std::fs::remove_file(path);
                continue;
            }
            Err(holder) => holder,
        };

        if started.elapsed() >= timeout {
            match holder {
                Holder::Alive(pid) => anyhow::bail!(
                    "another tally write is running (pid {pid}); try again after it finishes"
                ),
                _ => anyhow::bail!(
                    "could not acquire write lock at {}; remove it if no tally process is running",
                    path.display()
                ),
            }
        }
        tokio::time::sleep(LOCK_RETRY_DELAY).await;
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Holder {
    Alive(u32),
    Dead,
    Unreadable,
}

fn try_acquire(path: &Path) -> Result<WriteLockGuard, Holder> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create_new(true).write(true).open(path) {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let pid = std::fs::read_to_string(path)
                .ok()
                .and_then(|raw| raw.trim().parse::<u32>().ok());
            match pid {
                Some(pid) if is_process_running(pid) => Err(Holder::Alive(pid)),
                Some(_) => Err(Holder::Dead),
                None => Err(Holder::Unreadable),
            }
        }
        Err(_) => Err(Holder::Unreadable),
    }
}

fn is_process_running(pid: u32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Holder, acquire, lock_path, try_acquire};

    #[test]
    fn lock_lives_in_the_project_dir() {
        let path = lock_path(std::path::Path::new("/srv/count"));
        assert_eq!(path, std::path::Path::new("/srv/count/.tally/write.lock"));
    }

    #[test]
    fn acquires_and_releases_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = lock_path(temp.path());

        let guard = try_acquire(&path).expect("lock should acquire");
        assert!(path.is_file());
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn second_writer_sees_the_live_holder() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = lock_path(temp.path());

        let _guard = try_acquire(&path).expect("lock should acquire");
        let holder = try_acquire(&path).expect_err("lock is held");
        assert_eq!(holder, Holder::Alive(std::process::id()));
    }

    #[test]
    fn garbage_lock_file_is_unreadable() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = lock_path(temp.path());
        std::fs::create_dir_all(path.parent().expect("parent")).expect("dir should create");
        std::fs::write(&path, "not a pid").expect("lock should write");

        assert_eq!(try_acquire(&path).expect_err("lock is taken"), Holder::Unreadable);
    }

    #[tokio::test]
    async fn held_lock_times_out() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = lock_path(temp.path());

        let _guard = try_acquire(&path).expect("lock should acquire");
        let err = acquire(&path, Duration::ZERO)
            .await
            .expect_err("should time out");
        assert!(err.to_string().contains("another tally write is running"));
    }
}
