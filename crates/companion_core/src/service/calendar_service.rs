//! Calendar use-case service.
//!
//! # Responsibility
//! - Persist appointments in insertion order.
//! - Project a date-sorted display view that remembers storage positions.
//! - Schedule a reminder for `notify` appointments and cancel it on delete.
//!
//! # Invariants
//! - Display order is by `date`, ties keep insertion order.
//! - Deleting through the display view removes the displayed record, never
//!   the record that happens to share its storage position.
//! - Reminder failures are reported but never undo a saved list change.

use crate::model::appointment::Appointment;
use crate::model::record::RecordId;
use crate::reminder::{ReminderRequest, ReminderScheduler};
use crate::repo::{KeyValueStore, RepoError, StorageKey};
use crate::service::list_controller::{ControllerResult, ListController};
use chrono::{DateTime, Utc};
use log::warn;

/// One row of the date-sorted calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedAppointment<'a> {
    /// Index into the stored (insertion-ordered) list.
    pub storage_position: usize,
    pub appointment: &'a Appointment,
}

/// What happened to the reminder side effect of a calendar mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    NotRequested,
    Scheduled,
    Cancelled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedAppointment {
    pub id: RecordId,
    pub reminder: ReminderOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedAppointment {
    pub appointment: Appointment,
    pub reminder: ReminderOutcome,
}

/// Calendar screen state over the `Appointments` list.
pub struct CalendarService<S: KeyValueStore, R: ReminderScheduler> {
    list: ListController<Appointment, S>,
    scheduler: R,
    permission_granted: Option<bool>,
}

impl<S: KeyValueStore, R: ReminderScheduler> CalendarService<S, R> {
    /// Screen activation: loads appointments and asks for notification
    /// permission.
    pub fn open(store: S, scheduler: R) -> Self {
        let mut calendar = Self::attach(store, scheduler);
        calendar.permission_granted = Some(calendar.scheduler.request_permission());
        calendar
    }

    /// Loads appointments for a single list call without asking the
    /// scheduler for permission again.
    pub fn attach(store: S, scheduler: R) -> Self {
        Self {
            list: ListController::open(store, StorageKey::Appointments),
            scheduler,
            permission_granted: None,
        }
    }

    /// Stored appointments in insertion order.
    pub fn items(&self) -> &[Appointment] {
        self.list.items()
    }

    pub fn load_issue(&self) -> Option<&RepoError> {
        self.list.load_issue()
    }

    /// The permission answer from `open`; `None` after `attach`.
    pub fn permission_granted(&self) -> Option<bool> {
        self.permission_granted
    }

    pub fn scheduler(&self) -> &R {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut R {
        &mut self.scheduler
    }

    /// Appointments sorted by date for display.
    pub fn display(&self) -> Vec<DisplayedAppointment<'_>> {
        let mut rows = self
            .list
            .items()
            .iter()
            .enumerate()
            .map(|(storage_position, appointment)| DisplayedAppointment {
                storage_position,
                appointment,
            })
            .collect::<Vec<_>>();
        // Stable sort keeps insertion order for equal dates.
        rows.sort_by_key(|row| row.appointment.date);
        rows
    }

    /// Appends an appointment and schedules its reminder when `notify`.
    pub fn add_appointment(
        &mut self,
        title: &str,
        date: DateTime<Utc>,
        notify: bool,
    ) -> ControllerResult<AddedAppointment> {
        let id = self.list.add(|| Appointment::new(title, date, notify))?;
        if !notify {
            return Ok(AddedAppointment {
                id,
                reminder: ReminderOutcome::NotRequested,
            });
        }

        let reminder = match self.list.get(id).map(ReminderRequest::for_appointment) {
            Some(request) => match self.scheduler.schedule(&request) {
                Ok(()) => ReminderOutcome::Scheduled,
                Err(err) => {
                    warn!(
                        "event=appointment_add module=service status=reminder_failed id={} error={}",
                        id, err
                    );
                    ReminderOutcome::Failed(err.to_string())
                }
            },
            None => ReminderOutcome::Failed("appointment missing after save".to_string()),
        };
        Ok(AddedAppointment { id, reminder })
    }

    /// Removes the row at `display_position` of `display()`.
    pub fn remove_displayed(
        &mut self,
        display_position: usize,
    ) -> ControllerResult<Option<RemovedAppointment>> {
        let storage_position = match self.display().get(display_position) {
            Some(row) => row.storage_position,
            None => return Ok(None),
        };
        self.remove(storage_position)
    }

    /// Removes by storage position and cancels a pending reminder.
    pub fn remove(
        &mut self,
        storage_position: usize,
    ) -> ControllerResult<Option<RemovedAppointment>> {
        let Some(appointment) = self.list.remove(storage_position)? else {
            return Ok(None);
        };

        let reminder = if appointment.notify {
            match self.scheduler.cancel(appointment.id) {
                Ok(()) => ReminderOutcome::Cancelled,
                Err(err) => {
                    warn!(
                        "event=appointment_remove module=service status=cancel_failed id={} error={}",
                        appointment.id, err
                    );
                    ReminderOutcome::Failed(err.to_string())
                }
            }
        } else {
            ReminderOutcome::NotRequested
        };

        Ok(Some(RemovedAppointment {
            appointment,
            reminder,
        }))
    }
}
