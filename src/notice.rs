/// Severity of an on-screen notice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub level: NoticeLevel,
    expires_at: u64,
}

/// Dismissable, self-expiring notices shown in the corner of the screen.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notice that expires `ttl` ticks after `now`.  Returns its id.
    pub fn push(&mut self, title: &str, body: &str, level: NoticeLevel, now: u64, ttl: u64) -> u64 {
        self.next_id += 1;
        self.notices.push(Notice {
            id: self.next_id,
            title: title.to_string(),
            body: body.to_string(),
            level,
            expires_at: now.saturating_add(ttl),
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Dismiss the oldest notice, if any.
    pub fn dismiss_oldest(&mut self) -> Option<u64> {
        let id = self.notices.first()?.id;
        self.dismiss(id);
        Some(id)
    }

    pub fn expire(&mut self, now: u64) {
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize { self.notices.len() }
    pub fn is_empty(&self) -> bool { self.notices.is_empty() }
}
