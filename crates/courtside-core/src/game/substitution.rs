// Two-phase substitution selection.

use crate::model::PlayerId;

/// Which players are selected for a substitution in progress.
///
/// An incoming bench player can only be recorded once an outgoing starter
/// has been chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Substitution {
    #[default]
    None,
    /// A starter has been chosen to leave the floor.
    PendingStart { outgoing: PlayerId },
    /// A bench player has been chosen to replace them; awaiting confirmation.
    PendingConfirm {
        outgoing: PlayerId,
        incoming: PlayerId,
    },
}

impl Substitution {
    /// The starter leaving the floor, if one is selected.
    pub fn outgoing(&self) -> Option<PlayerId> {
        match *self {
            Substitution::None => None,
            Substitution::PendingStart { outgoing }
            | Substitution::PendingConfirm { outgoing, .. } => Some(outgoing),
        }
    }

    /// The bench player entering, if one is selected.
    pub fn incoming(&self) -> Option<PlayerId> {
        match *self {
            Substitution::PendingConfirm { incoming, .. } => Some(incoming),
            _ => None,
        }
    }

    /// Attach an incoming player to the current selection. Returns `None`
    /// when there is no outgoing starter to pair with. A previously chosen
    /// incoming player is replaced.
    pub fn with_incoming(self, incoming: PlayerId) -> Option<Substitution> {
        self.outgoing()
            .map(|outgoing| Substitution::PendingConfirm { outgoing, incoming })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Substitution::None)
    }
}
