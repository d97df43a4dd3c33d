//! Repository change notification
//!
//! Watches the working tree and the interesting parts of the git directory,
//! and emits one debounced signal per burst of changes. [`HeadTracker`]
//! lets the commit view ignore signals that did not move HEAD.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Quiet period that closes a burst of filesystem events
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Files directly inside the git dir whose changes move repository state
const STATE_FILES: &[&str] = &["HEAD", "index", "MERGE_HEAD", "REBASE_HEAD", "CHERRY_PICK_HEAD"];

/// Keeps the filesystem watcher alive; dropping it stops notifications
pub struct RepoWatcher {
    _watcher: RecommendedWatcher,
}

impl RepoWatcher {
    /// Watch `workdir` and `git_dir`
    ///
    /// Returns the watcher handle and a receiver that yields `()` once the
    /// repository has been quiet for [`DEBOUNCE`] after a change.
    pub fn new(workdir: &Path, git_dir: &Path) -> notify::Result<(Self, Receiver<()>)> {
        let (signal_tx, signal_rx) = mpsc::channel();
        let (raw_tx, raw_rx) = mpsc::channel::<Event>();

        spawn_debouncer(raw_rx, signal_tx)?;

        let git_dir_owned = git_dir.to_path_buf();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    if is_relevant_event(&event, &git_dir_owned) {
                        let _ = raw_tx.send(event);
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(workdir, RecursiveMode::Recursive)?;

        // Linked worktrees keep their git dir outside the workdir
        if !git_dir.starts_with(workdir) {
            watcher.watch(git_dir, RecursiveMode::NonRecursive)?;
        }
        let refs = git_dir.join("refs");
        if refs.is_dir() {
            watcher.watch(&refs, RecursiveMode::Recursive)?;
        }

        log::info!("watching {} for changes", workdir.display());
        Ok((Self { _watcher: watcher }, signal_rx))
    }
}

/// Whether `event` can change anything a view displays
fn is_relevant_event(event: &Event, git_dir: &Path) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }

    event.paths.iter().any(|path| match path.strip_prefix(git_dir) {
        Ok(relative) => {
            let relative = relative.to_string_lossy();
            STATE_FILES.contains(&relative.as_ref())
                || relative.starts_with("refs")
                || relative == "logs/refs/stash"
        }
        // Outside the git dir: a working tree edit
        Err(_) => true,
    })
}

/// Forward one signal per burst of raw events
fn spawn_debouncer(raw_rx: Receiver<Event>, out_tx: Sender<()>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("repo-watch-debounce".into())
        .spawn(move || {
            let mut last_event: Option<Instant> = None;

            loop {
                let timeout = match last_event {
                    Some(at) => DEBOUNCE.saturating_sub(at.elapsed()),
                    None => Duration::from_secs(60),
                };

                match raw_rx.recv_timeout(timeout) {
                    Ok(_) => last_event = Some(Instant::now()),
                    Err(RecvTimeoutError::Timeout) => {
                        if last_event.take().is_some() && out_tx.send(()).is_err() {
                            return;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        })
        .map(|_| ())
}

/// Remembers the last HEAD commit seen by a view
#[derive(Debug, Default, Clone)]
pub struct HeadTracker {
    current: Option<String>,
}

impl HeadTracker {
    /// Start tracking from `head`
    pub fn new(head: Option<String>) -> Self {
        Self { current: head }
    }

    /// Record `head`, returning whether it differs from the last one
    pub fn update(&mut self, head: Option<String>) -> bool {
        if self.current == head {
            return false;
        }
        self.current = head;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_relevant_events() {
        let git_dir = Path::new("/repo/.git");
        let modify = EventKind::Modify(ModifyKind::Any);

        assert!(is_relevant_event(&event(modify, "/repo/src/main.rs"), git_dir));
        assert!(is_relevant_event(&event(modify, "/repo/.git/HEAD"), git_dir));
        assert!(is_relevant_event(&event(modify, "/repo/.git/index"), git_dir));
        assert!(is_relevant_event(&event(EventKind::Create(CreateKind::File), "/repo/.git/refs/heads/x"), git_dir));
        assert!(is_relevant_event(&event(modify, "/repo/.git/logs/refs/stash"), git_dir));

        assert!(!is_relevant_event(&event(modify, "/repo/.git/objects/ab/cdef"), git_dir));
        assert!(!is_relevant_event(&event(EventKind::Access(notify::event::AccessKind::Any), "/repo/a"), git_dir));
    }

    #[test]
    fn test_head_tracker() {
        let mut tracker = HeadTracker::new(Some("a".to_string()));

        assert!(!tracker.update(Some("a".to_string())));
        assert!(tracker.update(Some("b".to_string())));
        assert!(!tracker.update(Some("b".to_string())));
        assert!(tracker.update(None));
    }

    #[test]
    fn test_debouncer_coalesces_bursts() {
        let (raw_tx, raw_rx) = mpsc::channel();
        let (out_tx, out_rx) = mpsc::channel();
        spawn_debouncer(raw_rx, out_tx).unwrap();

        for _ in 0..5 {
            raw_tx.send(Event::new(EventKind::Any)).unwrap();
        }

        assert!(out_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        assert!(out_rx.recv_timeout(DEBOUNCE * 2).is_err());
    }
}
