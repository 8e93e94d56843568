//! Launch state machine.

/// Phase the controller has reached.
///
/// Every phase before `Serving` can fail straight to process exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// Configuration parsed, nothing done yet.
    Parsed,
    /// Kill mode delivered its signal.
    Killed,
    /// No live competitor; our pid is recorded.
    SingletonChecked,
    /// The service is registered on every requested nettype.
    Registered,
    /// Running in the background with the pidfile rewritten.
    Daemonized,
    /// Inside the serve loop.
    Serving,
}

impl LaunchState {
    /// Whether the controller made it to the serve loop.
    pub fn reached_serving(self) -> bool {
        self == Self::Serving
    }
}

impl std::fmt::Display for LaunchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed => write!(f, "Parsed"),
            Self::Killed => write!(f, "Killed"),
            Self::SingletonChecked => write!(f, "SingletonChecked"),
            Self::Registered => write!(f, "Registered"),
            Self::Daemonized => write!(f, "Daemonized"),
            Self::Serving => write!(f, "Serving"),
        }
    }
}
