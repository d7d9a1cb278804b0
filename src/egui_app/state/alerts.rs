/// Most alerts kept at once; older ones fall off the end.
pub const MAX_ALERTS: usize = 10;

/// Severity used to colour an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertTone {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub tone: AlertTone,
    pub message: String,
}

/// User-facing notifications, newest first.
#[derive(Clone, Debug, Default)]
pub struct AlertList {
    entries: Vec<Alert>,
    next_id: u64,
}

impl AlertList {
    /// Add an alert at the front, dropping the oldest past [`MAX_ALERTS`].
    pub fn push(&mut self, tone: AlertTone, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.entries.insert(
            0,
            Alert {
                id: self.next_id,
                tone,
                message: message.into(),
            },
        );
        self.entries.truncate(MAX_ALERTS);
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|alert| alert.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Alert] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
