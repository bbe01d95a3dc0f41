//! Registry of admitted connections.
//!
//! Maps each [`ConnectionId`] to its display name and connection handle.
//! An entry exists exactly while a client is past the handshake and not yet
//! evicted. All reads and writes go through one mutex, which is never held
//! across an `.await`: broadcast code copies what it needs out of a
//! snapshot and writes to sockets after the lock is released.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use murmur_common::{ConnectionId, DisplayName, IdAllocator};

use crate::connection::Connection;
use crate::palette::Palette;
use crate::protocol::user_list;

struct Entry {
    name: DisplayName,
    connection: Arc<dyn Connection>,
}

struct RegistryState {
    // Ordered by id, i.e. by admission.
    entries: BTreeMap<ConnectionId, Entry>,
    palette: Palette,
}

/// A delivery target copied out of the registry.
#[derive(Clone)]
pub struct Recipient {
    pub id: ConnectionId,
    pub connection: Arc<dyn Connection>,
}

pub struct Registry {
    state: Mutex<RegistryState>,
    ids: IdAllocator,
    decorate: bool,
}

impl Registry {
    /// `decorate` turns on color tags for admitted names.
    pub fn new(decorate: bool) -> Self {
        Self::with_palette(decorate, Palette::new())
    }

    pub fn with_palette(decorate: bool, palette: Palette) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                entries: BTreeMap::new(),
                palette,
            }),
            ids: IdAllocator::new(),
            decorate,
        }
    }

    // A panic elsewhere never leaves the map half-updated: every mutation
    // is a single insert/remove, so a poisoned lock is still consistent.
    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether presence text uses decorated names.
    pub fn decorates(&self) -> bool {
        self.decorate
    }

    pub fn issue_id(&self) -> ConnectionId {
        self.ids.issue()
    }

    /// Insert or replace the entry for `id`. Returns the stored name, which
    /// carries a color tag when decoration is on.
    pub fn admit(
        &self,
        id: ConnectionId,
        name: DisplayName,
        connection: Arc<dyn Connection>,
    ) -> DisplayName {
        let mut state = self.state();

        if let Some(previous) = state.entries.remove(&id) {
            if let Some(tag) = previous.name.tag() {
                state.palette.release(tag);
            }
        }

        let tag = self.decorate.then(|| state.palette.draw());
        let name = name.with_tag(tag);
        state.entries.insert(
            id,
            Entry {
                name: name.clone(),
                connection,
            },
        );
        name
    }

    /// Remove the entry for `id`, if any, and return its name.
    pub fn evict(&self, id: ConnectionId) -> Option<DisplayName> {
        let mut state = self.state();
        let entry = state.entries.remove(&id)?;
        if let Some(tag) = entry.name.tag() {
            state.palette.release(tag);
        }
        Some(entry.name)
    }

    pub fn lookup(&self, id: ConnectionId) -> Option<DisplayName> {
        self.state().entries.get(&id).map(|e| e.name.clone())
    }

    /// Point-in-time list of admitted clients in admission order.
    pub fn snapshot(&self) -> Vec<(ConnectionId, DisplayName)> {
        self.state()
            .entries
            .iter()
            .map(|(id, e)| (*id, e.name.clone()))
            .collect()
    }

    /// Everyone currently admitted except `exclude`.
    pub fn recipients(&self, exclude: Option<ConnectionId>) -> Vec<Recipient> {
        self.state()
            .entries
            .iter()
            .filter(|(id, _)| Some(**id) != exclude)
            .map(|(id, e)| Recipient {
                id: *id,
                connection: Arc::clone(&e.connection),
            })
            .collect()
    }

    /// The `"alice, bob"` list used in presence frames.
    pub fn presence_list(&self) -> String {
        let state = self.state();
        user_list(state.entries.values().map(|e| e.name.render(self.decorate)))
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(false)
    }
}
