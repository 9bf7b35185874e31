/// Where an event key attaches its listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    Root,
    Ui(String),
}

/// Parsed `"<event>[:] [@ui.<name>]"` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventKey {
    pub event: String,
    pub target: BindTarget,
}

impl EventKey {
    /// Parse an event-map key. Every `:` in the event token is dropped and an
    /// optional `@ui.` prefix on the target is removed. Returns `None` for a
    /// key with no event name.
    pub fn parse(key: &str) -> Option<EventKey> {
        let mut tokens = key.split_whitespace();
        let event: String = tokens.next()?.chars().filter(|ch| *ch != ':').collect();
        if event.is_empty() {
            return None;
        }

        let target = match tokens.next() {
            Some(ui) => BindTarget::Ui(ui.strip_prefix("@ui.").unwrap_or(ui).to_string()),
            None => BindTarget::Root,
        };

        Some(EventKey { event, target })
    }
}

/// One attached listener.
#[derive(Debug)]
pub struct ListenerBinding<L> {
    pub event: String,
    pub listener: L,
}

/// Listeners grouped by element, kept so they can be detached later.
#[derive(Debug)]
pub struct ListenerRegistry<E, L> {
    entries: Vec<(E, Vec<ListenerBinding<L>>)>,
}

impl<E, L> Default for ListenerRegistry<E, L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: PartialEq, L> ListenerRegistry<E, L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, element: E, event: impl Into<String>, listener: L) {
        let binding = ListenerBinding {
            event: event.into(),
            listener,
        };
        match self.entries.iter_mut().find(|(entry, _)| *entry == element) {
            Some((_, bindings)) => bindings.push(binding),
            None => self.entries.push((element, vec![binding])),
        }
    }

    /// Remove and return every record, leaving the registry empty.
    pub fn drain(&mut self) -> Vec<(E, Vec<ListenerBinding<L>>)> {
        std::mem::take(&mut self.entries)
    }

    /// Total number of attached listeners.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, bindings)| bindings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct elements with listeners.
    pub fn element_count(&self) -> usize {
        self.entries.len()
    }

    /// Listeners for `event` on `element`.
    pub fn count(&self, element: &E, event: &str) -> usize {
        self.entries
            .iter()
            .filter(|(entry, _)| entry == element)
            .flat_map(|(_, bindings)| bindings)
            .filter(|binding| binding.event == event)
            .count()
    }
}
