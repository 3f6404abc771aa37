//! Crew movement simulation sessions
//!
//! Drives the dashboard's "crew en route" marker along a computed path.
//! All state lives in explicit per-session objects held by a store; a
//! session is created on start, advanced on tick, and destroyed on stop.

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::types::Coordinates;

/// One simulated crew movement along a path
#[derive(Debug, Clone)]
pub struct SimulationSession {
    path: Vec<Coordinates>,
    current_step_index: usize,
    is_active: bool,
}

/// Point-in-time view of a session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_step_index: usize,
    pub total_steps: usize,
    pub is_active: bool,
    pub position: Option<Coordinates>,
}

impl SimulationSession {
    /// Start at the first path point; an empty path is born inactive.
    pub fn start(path: Vec<Coordinates>) -> Self {
        Self {
            current_step_index: 0,
            is_active: !path.is_empty(),
            path,
        }
    }

    /// Advance one step. Returns the new position, or `None` once the
    /// session has finished (the final step deactivates it).
    pub fn tick(&mut self) -> Option<Coordinates> {
        if !self.is_active {
            return None;
        }

        if self.current_step_index + 1 < self.path.len() {
            self.current_step_index += 1;
            if self.current_step_index + 1 == self.path.len() {
                self.is_active = false;
            }
            self.position()
        } else {
            self.is_active = false;
            None
        }
    }

    pub fn position(&self) -> Option<Coordinates> {
        self.path.get(self.current_step_index).copied()
    }

    pub fn reset(&mut self) {
        self.current_step_index = 0;
        self.is_active = !self.path.is_empty();
    }

    pub fn stop(&mut self) {
        self.is_active = false;
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            current_step_index: self.current_step_index,
            total_steps: self.path.len(),
            is_active: self.is_active,
            position: self.position(),
        }
    }
}

/// In-memory session store, shared across handler tasks via `Arc`
#[derive(Default)]
pub struct SimulationStore {
    sessions: Mutex<HashMap<Uuid, SimulationSession>>,
}

impl SimulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its id with the initial state.
    pub fn start(&self, path: Vec<Coordinates>) -> (Uuid, SessionState) {
        let session = SimulationSession::start(path);
        let state = session.state();
        let id = Uuid::new_v4();
        self.sessions.lock().insert(id, session);
        (id, state)
    }

    /// Advance a session. `None` for unknown ids.
    pub fn tick(&self, id: &Uuid) -> Option<SessionState> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(id)?;
        session.tick();
        Some(session.state())
    }

    /// Rewind a session to its first step.
    pub fn reset(&self, id: &Uuid) -> Option<SessionState> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(id)?;
        session.reset();
        Some(session.state())
    }

    /// Stop and remove a session, returning its final state.
    pub fn stop(&self, id: &Uuid) -> Option<SessionState> {
        let mut sessions = self.sessions.lock();
        let mut session = sessions.remove(id)?;
        session.stop();
        Some(session.state())
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
