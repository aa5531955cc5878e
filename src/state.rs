//! Router state management

use crate::params::Location;
use crate::resolve::MatchStack;

/// Direction of a route change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Forward,
    Back,
}

/// Emitted every time the router moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChangeEvent {
    pub from: Option<String>,
    pub to: String,
    pub direction: NavigationDirection,
}

/// Router history plus the resolution of the current location.
#[derive(Debug, Clone)]
pub struct RouterState {
    /// Navigation history stack
    history: Vec<Location>,
    /// Current position in history
    current: usize,
    /// Match stack of the current location; `None` for unresolved locations
    current_stack: Option<MatchStack>,
}

impl RouterState {
    /// Create a router state sitting at `/`
    pub fn new() -> Self {
        Self::starting_at(Location::new("/"))
    }

    pub fn starting_at(location: Location) -> Self {
        Self {
            history: vec![location],
            current: 0,
            current_stack: None,
        }
    }

    /// Get current location
    pub fn current(&self) -> &Location {
        &self.history[self.current]
    }

    /// Get current path (without query)
    pub fn current_path(&self) -> &str {
        self.current().path()
    }

    /// Match stack of the current location
    pub fn current_stack(&self) -> Option<&MatchStack> {
        self.current_stack.as_ref()
    }

    /// Navigate to a new location
    pub fn push(&mut self, location: Location, stack: Option<MatchStack>) -> RouteChangeEvent {
        let from = Some(self.current().to_string());

        // Remove forward history when pushing
        self.history.truncate(self.current + 1);

        let to = location.to_string();
        self.history.push(location);
        self.current += 1;
        self.current_stack = stack;

        RouteChangeEvent {
            from,
            to,
            direction: NavigationDirection::Forward,
        }
    }

    /// Go back in history. The caller re-resolves the new location.
    pub fn back(&mut self) -> Option<RouteChangeEvent> {
        if self.current > 0 {
            let from = Some(self.current().to_string());
            self.current -= 1;
            self.current_stack = None;

            Some(RouteChangeEvent {
                from,
                to: self.current().to_string(),
                direction: NavigationDirection::Back,
            })
        } else {
            None
        }
    }

    /// Attach a resolution to the current location.
    pub fn set_current_stack(&mut self, stack: Option<MatchStack>) {
        self.current_stack = stack;
    }

    /// Number of history entries
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_truncates_forward_history() {
        let mut state = RouterState::new();
        state.push(Location::new("/orders"), None);
        state.push(Location::new("/banner"), None);
        state.back();

        let event = state.push(Location::new("/refund"), None);
        assert_eq!(event.from.as_deref(), Some("/orders"));
        assert_eq!(event.to, "/refund");
        assert_eq!(state.len(), 3);
        assert_eq!(state.back().map(|e| e.to).as_deref(), Some("/orders"));
    }

    #[test]
    fn test_back_at_start() {
        let mut state = RouterState::new();
        assert!(state.back().is_none());

        state.push(Location::new("/orders"), Some(MatchStack::new()));
        let event = state.back().unwrap();
        assert_eq!(event.direction, NavigationDirection::Back);
        assert_eq!(state.current_path(), "/");
        assert!(state.current_stack().is_none());
    }
}
