use std::collections::VecDeque;

/// Longest chat line accepted from the composer or from a peer, in characters.
pub const MAX_CHAT_LEN: usize = 200;

/// Which conversation a message belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChatMode {
    /// Everyone in the space.
    Global,
    /// Only peers standing in the same room.
    Zone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatEntry {
    pub sender: String,
    pub text: String,
    pub timestamp: u64,
    /// Room id for zone chat, `None` for global chat.
    pub zone: Option<String>,
    pub mine: bool,
}

/// Bounded history of received and sent chat messages.
#[derive(Debug)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
    capacity: usize,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::with_capacity(60)
    }
}

impl ChatLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity: capacity.max(1) }
    }

    pub fn push(&mut self, entry: ChatEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Messages for `mode`, oldest first.  Zone chat shows only messages sent
    /// in `zone`; with no current zone it is empty.
    pub fn visible<'a>(&'a self, mode: ChatMode, zone: Option<&'a str>) -> impl Iterator<Item = &'a ChatEntry> + 'a {
        self.entries.iter().filter(move |e| match mode {
            ChatMode::Global => e.zone.is_none(),
            ChatMode::Zone => zone.is_some() && e.zone.as_deref() == zone,
        })
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Line being typed into the chat box.
#[derive(Debug, Default)]
pub struct ChatComposer {
    draft: Option<String>,
}

impl ChatComposer {
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn open(&mut self) {
        self.draft.get_or_insert_with(String::new);
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Append typed characters; control characters are skipped.
    pub fn type_text(&mut self, text: &str) {
        if let Some(draft) = self.draft.as_mut() {
            for ch in text.chars().filter(|c| !c.is_control()) {
                if draft.chars().count() >= MAX_CHAT_LEN {
                    break;
                }
                draft.push(ch);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop();
        }
    }

    /// Close the box and return what was typed.
    pub fn take(&mut self) -> Option<String> {
        self.draft.take()
    }
}
