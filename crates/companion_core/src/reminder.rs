//! Local reminder scheduling seam.
//!
//! # Responsibility
//! - Describe one-shot reminders derived from appointments.
//! - Queue schedule/cancel commands for the host platform to execute.
//!
//! # Invariants
//! - The record id is the notification identifier, so a reminder can be
//!   cancelled through the id of the record that created it.
//! - Fire times carry minute precision only.
//! - Permission is best effort: scheduling is attempted even when denied.

use crate::model::appointment::Appointment;
use crate::model::record::RecordId;
use chrono::{DateTime, Timelike, Utc};
use log::{info, warn};
use std::collections::{BTreeSet, VecDeque};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Notification title used for every appointment reminder.
pub const REMINDER_TITLE: &str = "Erinnerung";

/// Pending notification cap enforced by mobile platforms.
pub const DEFAULT_MAX_PENDING: usize = 64;

/// One-shot local notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Utc>,
}

impl ReminderRequest {
    pub fn for_appointment(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            title: REMINDER_TITLE.to_string(),
            body: appointment.title.clone(),
            fire_at: truncate_to_minute(appointment.date),
        }
    }
}

/// Command handed to the platform notification center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCommand {
    Schedule(ReminderRequest),
    Cancel(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// Platform pending-notification limit reached.
    TooManyPending { limit: usize },
    /// Platform rejected the request.
    Rejected(String),
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyPending { limit } => {
                write!(f, "too many pending reminders (limit {limit})")
            }
            Self::Rejected(message) => write!(f, "reminder rejected: {message}"),
        }
    }
}

impl Error for ReminderError {}

/// Platform notification scheduler.
pub trait ReminderScheduler {
    /// Asks for notification permission. The answer never gates scheduling.
    fn request_permission(&mut self) -> bool;
    fn schedule(&mut self, request: &ReminderRequest) -> Result<(), ReminderError>;
    /// Cancels a reminder. Unknown ids are not an error.
    fn cancel(&mut self, id: RecordId) -> Result<(), ReminderError>;
}

impl<T: ReminderScheduler + ?Sized> ReminderScheduler for &mut T {
    fn request_permission(&mut self) -> bool {
        (**self).request_permission()
    }

    fn schedule(&mut self, request: &ReminderRequest) -> Result<(), ReminderError> {
        (**self).schedule(request)
    }

    fn cancel(&mut self, id: RecordId) -> Result<(), ReminderError> {
        (**self).cancel(id)
    }
}

/// Scheduler that queues commands for the host to drain.
#[derive(Debug)]
pub struct QueuedReminderScheduler {
    permission_granted: bool,
    max_pending: usize,
    pending: BTreeSet<RecordId>,
    commands: VecDeque<ReminderCommand>,
}

impl Default for QueuedReminderScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PENDING)
    }
}

impl QueuedReminderScheduler {
    pub fn new(max_pending: usize) -> Self {
        Self {
            permission_granted: false,
            max_pending,
            pending: BTreeSet::new(),
            commands: VecDeque::new(),
        }
    }

    /// Records the platform's permission answer.
    pub fn set_permission(&mut self, granted: bool) {
        self.permission_granted = granted;
    }

    /// Ids with a scheduled, not yet cancelled reminder.
    pub fn pending_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.pending.iter().copied()
    }

    /// Takes all queued commands in submission order.
    pub fn drain(&mut self) -> Vec<ReminderCommand> {
        self.commands.drain(..).collect()
    }
}

impl ReminderScheduler for QueuedReminderScheduler {
    fn request_permission(&mut self) -> bool {
        if !self.permission_granted {
            warn!("event=reminder_permission module=reminder status=denied");
        }
        self.permission_granted
    }

    fn schedule(&mut self, request: &ReminderRequest) -> Result<(), ReminderError> {
        if !self.pending.contains(&request.id) && self.pending.len() >= self.max_pending {
            warn!(
                "event=reminder_schedule module=reminder status=error id={} error=too_many_pending",
                request.id
            );
            return Err(ReminderError::TooManyPending {
                limit: self.max_pending,
            });
        }

        self.pending.insert(request.id);
        self.commands
            .push_back(ReminderCommand::Schedule(request.clone()));
        info!(
            "event=reminder_schedule module=reminder status=queued id={} fire_at={}",
            request.id,
            request.fire_at.to_rfc3339()
        );
        Ok(())
    }

    // Always forwarded: the platform may still hold a reminder scheduled by
    // an earlier process.
    fn cancel(&mut self, id: RecordId) -> Result<(), ReminderError> {
        let was_pending = self.pending.remove(&id);
        self.commands.push_back(ReminderCommand::Cancel(id));
        info!("event=reminder_cancel module=reminder status=queued id={id} was_pending={was_pending}");
        Ok(())
    }
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(at)
}
