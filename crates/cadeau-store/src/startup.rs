//! Process-lifetime initialization state.

/// "Ran once this process" guards for the startup routines.
///
/// The storefront kept these as module-level mutable flags; here the binary
/// constructs one at startup and threads it through, so tests can reset the
/// state by constructing a fresh value.
#[derive(Debug, Default)]
pub struct StartupGuards {
    /// Set once the legacy-user migration has been attempted.
    pub migration_ran: bool,
    /// Set once admin seeding has been attempted.
    pub admin_seeded: bool,
}

impl StartupGuards {
    pub fn new() -> Self {
        Self::default()
    }
}
