//! Navigation guard
//!
//! `Idle -> ConfirmPending -> {save and proceed | cancel}`. Browser unload
//! cannot await a save, so it only gets a synchronous allow/block answer.

/// Where the user asked to go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// In-app route change
    Route(String),
    /// Tab switch inside the client screen
    Tab(String),
    /// Closing the screen or window
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Idle,
    ConfirmPending {
        destination: NavTarget,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    Proceed(NavTarget),
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    Allow,
    Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationGuard {
    state: GuardState,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, GuardState::ConfirmPending { .. })
    }

    pub fn pending_destination(&self) -> Option<&NavTarget> {
        match &self.state {
            GuardState::ConfirmPending { destination } => Some(destination),
            GuardState::Idle => None,
        }
    }

    /// A later request while already pending replaces the stored destination.
    pub fn request(&mut self, destination: NavTarget, dirty: bool) -> NavDecision {
        if !dirty {
            self.state = GuardState::Idle;
            return NavDecision::Proceed(destination);
        }
        tracing::debug!(?destination, "Holding navigation for unsaved changes");
        self.state = GuardState::ConfirmPending { destination };
        NavDecision::Confirm
    }

    /// Drops the stored destination. Edits are kept.
    pub fn cancel(&mut self) -> Option<NavTarget> {
        match std::mem::take(&mut self.state) {
            GuardState::ConfirmPending { destination } => Some(destination),
            GuardState::Idle => None,
        }
    }

    /// Called once the pending save succeeded; yields the destination to perform.
    pub fn complete(&mut self) -> Option<NavTarget> {
        self.cancel()
    }

    pub fn unload_decision(&self, dirty: bool) -> UnloadDecision {
        if dirty {
            UnloadDecision::Block
        } else {
            UnloadDecision::Allow
        }
    }
}
