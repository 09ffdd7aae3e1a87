/// Greeting used when the counter screen is opened without one.
pub const DEFAULT_COUNTER_MESSAGE: &str = "The Counter is";

/// Toy counter screen state. The greeting comes from the route params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    pub message: String,
    pub count: u64,
}

impl CounterState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            count: 0,
        }
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// `"<message> <count>"`, e.g. `"The Counter is 3"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.message, self.count)
    }
}
