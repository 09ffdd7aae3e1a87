//! Navigation shell: a typed route stack.
//!
//! Each screen has exactly one parameter contract, encoded in its [`Route`]
//! variant. A screen counts as mounted while its route is anywhere on the
//! stack; transitions report the routes they removed so the app can tear
//! down whatever those screens owned.
use crate::story::Story;

/// Screen registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Stories,
    Details,
    Counter,
}

impl RouteName {
    /// Parse a screen name from config/CLI (case-insensitive).
    ///
    /// `Details` is not accepted: it cannot be entered without a story.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stories" | "posts" => Some(Self::Stories),
            "counter" => Some(Self::Counter),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Stories => "Stories",
            Self::Details => "Details",
            Self::Counter => "Counter",
        }
    }
}

/// A screen together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Stories,
    Details { story: Story },
    Counter { message: String },
}

impl Route {
    pub fn name(&self) -> RouteName {
        match self {
            Self::Stories => RouteName::Stories,
            Self::Details { .. } => RouteName::Details,
            Self::Counter { .. } => RouteName::Counter,
        }
    }
}

/// Stack navigator. The bottom entry (initial route) is never popped.
#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // Invariant: the stack always holds the initial route.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn contains(&self, name: RouteName) -> bool {
        self.stack.iter().any(|r| r.name() == name)
    }

    /// Route names from the root up.
    pub fn names(&self) -> impl Iterator<Item = RouteName> + '_ {
        self.stack.iter().map(Route::name)
    }

    /// Go to `route`.
    ///
    /// If a screen with the same name is already on the stack, everything
    /// above it is popped and its params are replaced; otherwise the route is
    /// pushed. Returns the routes that left the stack, top first.
    pub fn navigate(&mut self, route: Route) -> Vec<Route> {
        let name = route.name();
        tracing::debug!(to = ?name, depth = self.stack.len(), "Navigate");

        match self.stack.iter().position(|r| r.name() == name) {
            Some(idx) => {
                let removed: Vec<Route> = self.stack.drain(idx + 1..).rev().collect();
                self.stack[idx] = route;
                removed
            }
            None => {
                self.stack.push(route);
                Vec::new()
            }
        }
    }

    /// Pop the top route. Returns `None` at the root.
    pub fn go_back(&mut self) -> Option<Route> {
        if self.stack.len() <= 1 {
            return None;
        }
        let popped = self.stack.pop();
        tracing::debug!(from = ?popped.as_ref().map(Route::name), "Navigate back");
        popped
    }
}
