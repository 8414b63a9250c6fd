/// Page state definitions for tracking crawl progress
///
/// This module defines every stage a discovered URL can reach.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL passed admission and holds one unit of the page budget
    Admitted,

    // ===== Terminal Success States =====
    /// Page was fetched, extracted and stored in the results
    Recorded,

    // ===== Terminal Skip States =====
    /// URL cannot be parsed or has no host
    Malformed,

    /// URL host differs from the seed host
    OutOfScope,

    /// URL matches a robots.txt disallow prefix
    RobotsDenied,

    /// URL's normalized key was already admitted
    Duplicate,

    /// Page budget was exhausted before this URL was admitted
    BudgetExhausted,

    // ===== Terminal Error States =====
    /// Fetch failed (network error, non-2xx status, non-HTML body)
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Admitted)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Returns true if the URL was turned away without being fetched
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::Malformed
                | Self::OutOfScope
                | Self::RobotsDenied
                | Self::Duplicate
                | Self::BudgetExhausted
        )
    }

    /// Returns true if reaching this state consumed page budget
    pub fn consumes_budget(&self) -> bool {
        matches!(self, Self::Admitted | Self::Recorded | Self::Failed)
    }

    /// Returns the snake_case label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Recorded => "recorded",
            Self::Malformed => "malformed",
            Self::OutOfScope => "out_of_scope",
            Self::RobotsDenied => "robots_denied",
            Self::Duplicate => "duplicate",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Failed => "failed",
        }
    }

    /// Returns all terminal states, in reporting order
    pub fn terminal_states() -> [Self; 7] {
        [
            Self::Recorded,
            Self::Failed,
            Self::Duplicate,
            Self::BudgetExhausted,
            Self::OutOfScope,
            Self::RobotsDenied,
            Self::Malformed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
