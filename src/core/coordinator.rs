// src/core/coordinator.rs

//! # Session/Result Coordinator
//!
//! Explicit state machine behind the result area: `Idle -> Pending -> Displayed`,
//! restarted by every user action. It owns the display region and the session
//! control, and never talks to the network itself; callers feed it the
//! responses they receive.

use crate::{core::pretty, models::ApiResponse};

/// A user gesture that starts a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit { path: String },
    ReloadConfiguration,
    ReloadCommands,
    SetPassword,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Pending(Action),
    Displayed(ResultView),
}

/// One rendered response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub ok: bool,
    pub status: u16,
    pub message: Option<String>,
    pub code: Option<i64>,
    /// Pretty-printed `result`.
    pub body: String,
    /// Pretty-printed `statistics`, when the service sent any.
    pub statistics: Option<String>,
}

impl ResultView {
    pub fn from_response(response: &ApiResponse) -> Self {
        Self {
            ok: response.ok,
            status: response.status,
            message: response.message.clone(),
            code: response.code,
            body: pretty::render(&response.result, 0),
            statistics: response
                .statistics
                .as_ref()
                .filter(|stats| !stats.is_null())
                .map(|stats| pretty::render(stats, 0)),
        }
    }
}

/// The control offered in the Settings menu for ending or restoring the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Logout,
    Login,
}

/// What the result area currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayRegion {
    pub waiting: bool,
    pub result: Option<ResultView>,
    /// The "Login Again" affordance under the result. Never more than one.
    pub login_again: bool,
}

impl DisplayRegion {
    /// Whether a result is shown and the service reported success.
    pub fn succeeded(&self) -> bool {
        self.result.as_ref().is_some_and(|view| view.ok)
    }
}

#[derive(Debug, Clone)]
pub struct Coordinator {
    phase: Phase,
    degraded: bool,
    display: DisplayRegion,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            degraded: false,
            display: DisplayRegion::default(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn display(&self) -> &DisplayRegion {
        &self.display
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn session_control(&self) -> SessionControl {
        if self.degraded {
            SessionControl::Login
        } else {
            SessionControl::Logout
        }
    }

    /// Selecting a command restarts the cycle and clears the result area.
    pub fn select(&mut self) {
        self.phase = Phase::Idle;
        self.display.waiting = false;
        self.display.result = None;
        self.sync_login_again();
    }

    /// `Idle -> Pending`: clears any previous result and shows the waiting indicator.
    pub fn begin(&mut self, action: Action) {
        log::debug!("Coordinator: pending {:?}", action);
        self.phase = Phase::Pending(action);
        self.display.waiting = true;
        self.display.result = None;
        self.sync_login_again();
    }

    /// `Pending -> Displayed`, whatever the outcome. A completion that arrives
    /// after a newer action began still overwrites the display.
    pub fn complete(&mut self, response: &ApiResponse) -> &DisplayRegion {
        if !matches!(self.phase, Phase::Pending(_)) {
            log::debug!("Coordinator: completion arrived outside a pending cycle");
        }
        if response.is_unauthorized() {
            self.degrade();
        }

        let view = ResultView::from_response(response);
        self.phase = Phase::Displayed(view.clone());
        self.display.waiting = false;
        self.display.result = Some(view);
        self.sync_login_again();
        &self.display
    }

    /// One-way switch to the degraded session. Repeated calls change nothing.
    pub fn degrade(&mut self) {
        if !self.degraded {
            log::warn!("Session rejected by the service; switching to login.");
            self.degraded = true;
        }
        self.sync_login_again();
    }

    fn sync_login_again(&mut self) {
        self.display.login_again = self.degraded && self.display.result.is_some();
    }
}
