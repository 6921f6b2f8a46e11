//! Move legality as pure functions of the moving card and the destination's top card.

use super::card::{ACE, Card, KING};

/// Foundations build up by suit from the ace.
pub fn can_move_to_foundation(card: &Card, top: Option<&Card>) -> bool {
    if !card.face_up {
        return false;
    }
    match top {
        None => card.rank == ACE,
        Some(top) => top.suit == card.suit && card.rank == top.rank + 1,
    }
}

/// Tableaus build down in alternating colors; only a king opens an empty column.
pub fn can_move_to_tableau(card: &Card, top: Option<&Card>) -> bool {
    if !card.face_up {
        return false;
    }
    match top {
        None => card.rank == KING,
        Some(top) => top.face_up && top.color() != card.color() && card.rank + 1 == top.rank,
    }
}
