//! Countdown timer persistence.
//!
//! The host drives `tick` once per second while the timer screen is visible;
//! every state change is written so a relaunch resumes where it stopped.

use crate::model::timer::TimerState;
use crate::repo::{KeyValueStore, ListRepository, RepoError, RepoResult, StorageKey};
use log::{error, warn};

pub struct TimerService<S: KeyValueStore> {
    repo: ListRepository<S>,
    state: TimerState,
    load_issue: Option<RepoError>,
}

impl<S: KeyValueStore> TimerService<S> {
    /// Restores `RemainingTime` and `IsRunning`; missing keys mean zero/stopped.
    pub fn open(store: S) -> Self {
        let repo = ListRepository::new(store);
        let mut load_issue = None;

        let remaining_secs = match repo.load_value::<f64>(StorageKey::RemainingTime) {
            Ok(value) => value.unwrap_or(0.0).max(0.0),
            Err(err) => {
                warn!("event=timer_open module=service status=degraded error={err}");
                load_issue = Some(err);
                0.0
            }
        };
        let is_running = match repo.load_value::<bool>(StorageKey::IsRunning) {
            Ok(value) => value.unwrap_or(false),
            Err(err) => {
                warn!("event=timer_open module=service status=degraded error={err}");
                load_issue.get_or_insert(err);
                false
            }
        };

        Self {
            repo,
            state: TimerState {
                remaining_secs,
                is_running,
            },
            load_issue,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn load_issue(&self) -> Option<&RepoError> {
        self.load_issue.as_ref()
    }

    pub fn start(&mut self) -> RepoResult<()> {
        self.apply(|state| state.is_running = true)
    }

    pub fn stop(&mut self) -> RepoResult<()> {
        self.apply(|state| state.is_running = false)
    }

    pub fn set_remaining(&mut self, secs: f64) -> RepoResult<()> {
        self.apply(|state| state.remaining_secs = secs.max(0.0))
    }

    /// One-second step. A stopped timer is left alone and nothing is written.
    pub fn tick(&mut self) -> RepoResult<()> {
        if !self.state.is_running {
            return Ok(());
        }
        self.apply(|state| {
            state.tick();
        })
    }

    /// Writes both keys, then commits to memory. If the second write fails the
    /// first one is reverted, so storage keeps matching `state`.
    fn apply(&mut self, change: impl FnOnce(&mut TimerState)) -> RepoResult<()> {
        let mut candidate = self.state;
        change(&mut candidate);

        let previous_remaining = self.repo.store().get(StorageKey::RemainingTime)?;
        self.repo
            .save_value(StorageKey::RemainingTime, &candidate.remaining_secs)?;
        if let Err(err) = self
            .repo
            .save_value(StorageKey::IsRunning, &candidate.is_running)
        {
            self.revert_remaining(previous_remaining);
            return Err(err);
        }

        self.state = candidate;
        Ok(())
    }

    fn revert_remaining(&self, previous: Option<String>) {
        let store = self.repo.store();
        let reverted = match previous {
            Some(raw) => store.set(StorageKey::RemainingTime, &raw),
            None => store.remove(StorageKey::RemainingTime).map(|_| ()),
        };
        match reverted {
            Ok(()) => warn!("event=timer_save module=service status=reverted"),
            Err(err) => error!(
                "event=timer_save module=service status=revert_failed error={err}"
            ),
        }
    }
}
