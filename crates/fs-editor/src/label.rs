//! In-place label editing.
//!
//! Each node has a two-state machine, `Display` and `Editing`, holding the
//! editable buffer. States live in [`LabelEditors`], next to the graph store
//! rather than inside it. While editing, keystrokes only touch the buffer;
//! the store keeps the last committed label until blur or Enter, which
//! produces exactly one commit.

use fs_core::ElementId;
use std::collections::HashMap;

/// Receives committed labels. Implemented by the engine that owns the store.
pub trait LabelCommitSink {
    fn label_committed(&mut self, id: ElementId, label: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelState {
    /// Showing the stored label. `buffer` mirrors it for the next edit.
    Display { buffer: String },
    /// The edit surface is open with a live buffer.
    Editing { buffer: String },
}

impl Default for LabelState {
    fn default() -> Self {
        Self::Display {
            buffer: String::new(),
        }
    }
}

impl LabelState {
    pub fn buffer(&self) -> &str {
        match self {
            Self::Display { buffer } | Self::Editing { buffer } => buffer,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelEvent<'a> {
    /// Double-click; carries the label currently in the store.
    DoubleClick { current: &'a str },
    Input(&'a str),
    Blur,
    Key(&'a str),
    /// The stored label changed from somewhere other than this editor.
    External(&'a str),
}

/// Side effect of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelEffect {
    Commit(String),
}

/// Pure transition function.
pub fn transition(state: LabelState, event: LabelEvent<'_>) -> (LabelState, Option<LabelEffect>) {
    use LabelEvent as E;
    use LabelState as S;

    match (state, event) {
        (S::Display { .. }, E::DoubleClick { current }) => (
            S::Editing {
                buffer: current.to_string(),
            },
            None,
        ),
        (S::Display { .. }, E::External(label)) => (
            S::Display {
                buffer: label.to_string(),
            },
            None,
        ),
        // The edit surface follows the store, so a later commit cannot
        // write back a label older than the external one.
        (S::Editing { .. }, E::External(label)) => (
            S::Editing {
                buffer: label.to_string(),
            },
            None,
        ),
        (S::Editing { .. }, E::Input(text)) => (
            S::Editing {
                buffer: text.to_string(),
            },
            None,
        ),
        (S::Editing { buffer }, E::Blur) | (S::Editing { buffer }, E::Key("Enter")) => {
            let effect = LabelEffect::Commit(buffer.clone());
            (S::Display { buffer }, Some(effect))
        }
        // Everything else (typing while displayed, a second double-click,
        // other keys) leaves the state alone.
        (state, _) => (state, None),
    }
}

/// Per-node label state, keyed by node id.
#[derive(Debug, Default)]
pub struct LabelEditors {
    states: HashMap<ElementId, LabelState>,
}

impl LabelEditors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an event to one node's machine, forwarding any commit to `sink`.
    /// Returns `true` if the state or the store changed.
    pub fn handle(
        &mut self,
        id: ElementId,
        event: LabelEvent<'_>,
        sink: &mut dyn LabelCommitSink,
    ) -> bool {
        let state = self.states.remove(&id).unwrap_or_default();
        let before = state.clone();
        let (next, effect) = transition(state, event);
        let changed = next != before || effect.is_some();
        if before.is_editing() != next.is_editing() {
            log::debug!("label {id}: editing={}", next.is_editing());
        }
        self.states.insert(id, next);

        if let Some(LabelEffect::Commit(label)) = effect {
            sink.label_committed(id, &label);
        }
        changed
    }

    /// Current buffer for a node, if it has ever been touched.
    pub fn buffer(&self, id: ElementId) -> Option<&str> {
        self.states.get(&id).map(LabelState::buffer)
    }

    pub fn is_editing(&self, id: ElementId) -> bool {
        self.states.get(&id).is_some_and(LabelState::is_editing)
    }

    /// Nodes with an open edit surface and their live buffers.
    pub fn editing(&self) -> impl Iterator<Item = (ElementId, &str)> + '_ {
        self.states
            .iter()
            .filter(|(_, s)| s.is_editing())
            .map(|(id, s)| (*id, s.buffer()))
    }

    /// Drop state for a removed node.
    pub fn forget(&mut self, id: ElementId) {
        self.states.remove(&id);
    }
}
