//! Feature use-case services.
//!
//! # Responsibility
//! - Hold each feature screen's in-memory state while it is active.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Every mutation is persisted before it becomes visible in memory.

pub mod calendar_service;
pub mod list_controller;
pub mod menu_service;
pub mod note_service;
pub mod quiz_session;
pub mod timer_service;
pub mod todo_service;
pub mod weather_panel;
