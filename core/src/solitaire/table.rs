use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId, standard_deck};
use super::rules::{can_move_to_foundation, can_move_to_tableau};
use crate::{GameError, Result};

pub const DECK_SIZE: usize = 52;
pub const FOUNDATION_COUNT: u8 = 4;
pub const TABLEAU_COUNT: u8 = 7;

/// A run of cards in flight, lead card first.
pub type Run = SmallVec<[CardId; 13]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileId {
    Stock,
    Waste,
    Foundation(u8),
    Tableau(u8),
}

impl PileId {
    pub fn foundations() -> impl Iterator<Item = PileId> {
        (0..FOUNDATION_COUNT).map(PileId::Foundation)
    }

    pub fn tableaus() -> impl Iterator<Item = PileId> {
        (0..TABLEAU_COUNT).map(PileId::Tableau)
    }

    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::Stock, PileId::Waste]
            .into_iter()
            .chain(Self::foundations())
            .chain(Self::tableaus())
    }

    pub const fn is_tableau(self) -> bool {
        matches!(self, PileId::Tableau(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(CardId),
    Recycled,
    Empty,
}

/// Card arena plus the thirteen piles that index into it. Top of a pile is its last element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Table {
    cards: Vec<Card>,
    stock: Vec<CardId>,
    waste: Vec<CardId>,
    foundations: [Vec<CardId>; FOUNDATION_COUNT as usize],
    tableaus: [Vec<CardId>; TABLEAU_COUNT as usize],
}

impl Table {
    fn empty() -> Self {
        Self {
            cards: standard_deck(),
            stock: Vec::with_capacity(DECK_SIZE),
            waste: Vec::with_capacity(DECK_SIZE),
            foundations: Default::default(),
            tableaus: Default::default(),
        }
    }

    /// Shuffles a fresh deck and deals the Klondike layout: column `i` gets
    /// `i + 1` cards with only the last face-up, the rest goes to the stock.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table = Self::empty();
        let mut deck: Vec<CardId> = table
            .cards
            .iter()
            .map(|card| CardId::of(card.suit, card.rank))
            .collect();
        deck.shuffle(rng);

        for column in 0..TABLEAU_COUNT as usize {
            for row in 0..=column {
                let Some(id) = deck.pop() else { break };
                table.cards[id.index()].face_up = row == column;
                table.tableaus[column].push(id);
            }
        }
        while let Some(id) = deck.pop() {
            table.cards[id.index()].face_up = false;
            table.stock.push(id);
        }

        log::debug!("dealt, {} cards left in stock", table.stock.len());
        table
    }

    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> &mut Card {
        &mut self.cards[id.index()]
    }

    pub fn pile(&self, pile: PileId) -> &[CardId] {
        match pile {
            PileId::Stock => &self.stock,
            PileId::Waste => &self.waste,
            PileId::Foundation(i) => &self.foundations[usize::from(i)],
            PileId::Tableau(i) => &self.tableaus[usize::from(i)],
        }
    }

    fn pile_mut(&mut self, pile: PileId) -> &mut Vec<CardId> {
        match pile {
            PileId::Stock => &mut self.stock,
            PileId::Waste => &mut self.waste,
            PileId::Foundation(i) => &mut self.foundations[usize::from(i)],
            PileId::Tableau(i) => &mut self.tableaus[usize::from(i)],
        }
    }

    pub fn top(&self, pile: PileId) -> Option<CardId> {
        self.pile(pile).last().copied()
    }

    pub fn top_card(&self, pile: PileId) -> Option<&Card> {
        self.top(pile).map(|id| self.card(id))
    }

    /// Cards currently sitting in piles; a drag in progress holds the rest.
    pub fn card_count(&self) -> usize {
        PileId::all().map(|pile| self.pile(pile).len()).sum()
    }

    pub fn foundation_total(&self) -> usize {
        self.foundations.iter().map(Vec::len).sum()
    }

    pub fn is_won(&self) -> bool {
        self.foundation_total() == DECK_SIZE
    }

    /// Turns the stock's top card onto the waste, or recycles the whole waste
    /// back into the stock face-down when the stock is empty.
    pub fn draw(&mut self) -> DrawOutcome {
        if let Some(id) = self.stock.pop() {
            self.cards[id.index()].face_up = true;
            self.waste.push(id);
            return DrawOutcome::Drawn(id);
        }
        if self.waste.is_empty() {
            return DrawOutcome::Empty;
        }
        while let Some(id) = self.waste.pop() {
            self.cards[id.index()].face_up = false;
            self.stock.push(id);
        }
        DrawOutcome::Recycled
    }

    /// Lifts the cards from `index` to the top of `pile`. Tableaus give up any
    /// face-up suffix; the waste and foundations only their top card.
    pub fn take_run(&mut self, pile: PileId, index: usize) -> Result<Run> {
        let cards = self.pile(pile);
        if index >= cards.len() {
            return Err(GameError::NothingToPick);
        }
        match pile {
            PileId::Stock => return Err(GameError::NothingToPick),
            PileId::Tableau(_) => {
                if !cards[index..].iter().all(|&id| self.card(id).face_up) {
                    return Err(GameError::NothingToPick);
                }
            }
            PileId::Waste | PileId::Foundation(_) => {
                if index + 1 != cards.len() {
                    return Err(GameError::NothingToPick);
                }
            }
        }
        Ok(self.pile_mut(pile).drain(index..).collect())
    }

    /// Appends `run` to `pile` without any legality check.
    pub fn put_run(&mut self, pile: PileId, run: &[CardId]) {
        self.pile_mut(pile).extend_from_slice(run);
    }

    /// Whether `pile` would legally take a run of `len` cards led by `lead`.
    pub fn accepts(&self, pile: PileId, lead: CardId, len: usize) -> bool {
        let card = self.card(lead);
        let top = self.top_card(pile);
        match pile {
            PileId::Foundation(_) => len == 1 && can_move_to_foundation(card, top),
            PileId::Tableau(_) => can_move_to_tableau(card, top),
            PileId::Stock | PileId::Waste => false,
        }
    }

    pub fn accepting_foundation(&self, id: CardId) -> Option<PileId> {
        PileId::foundations().find(|&f| self.accepts(f, id, 1))
    }

    /// Exposes the new top of a tableau. Returns true when a card was turned.
    pub fn flip_top_if_needed(&mut self, pile: PileId) -> bool {
        if !pile.is_tableau() {
            return false;
        }
        match self.top(pile) {
            Some(id) if !self.card(id).face_up => {
                self.cards[id.index()].face_up = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
impl Table {
    /// Every card face-down in the stock, in id order.
    pub(crate) fn sorted() -> Self {
        let mut table = Self::empty();
        table.stock = table
            .cards
            .iter()
            .map(|card| CardId::of(card.suit, card.rank))
            .collect();
        table
    }

    /// Moves a card from wherever it is onto `pile`.
    pub(crate) fn place(
        &mut self,
        suit: super::card::Suit,
        rank: super::card::Rank,
        pile: PileId,
        face_up: bool,
    ) -> CardId {
        let id = CardId::of(suit, rank);
        for from in PileId::all() {
            self.pile_mut(from).retain(|&other| other != id);
        }
        self.cards[id.index()].face_up = face_up;
        self.pile_mut(pile).push(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::super::card::Suit;
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn dealt() -> Table {
        Table::deal(&mut SmallRng::seed_from_u64(9))
    }

    #[test]
    fn deal_lays_out_klondike() {
        let table = dealt();

        for (i, pile) in PileId::tableaus().enumerate() {
            let cards = table.pile(pile);
            assert_eq!(cards.len(), i + 1);
            let (top, rest) = cards.split_last().unwrap();
            assert!(table.card(*top).face_up);
            assert!(rest.iter().all(|&id| !table.card(id).face_up));
        }
        assert_eq!(table.pile(PileId::Stock).len(), 24);
        assert!(table.pile(PileId::Stock).iter().all(|&id| !table.card(id).face_up));
        assert_eq!(table.card_count(), DECK_SIZE);
    }

    #[test]
    fn deal_holds_each_card_once() {
        let table = dealt();
        let mut seen = [false; DECK_SIZE];

        for pile in PileId::all() {
            for &id in table.pile(pile) {
                assert!(!seen[id.index()]);
                seen[id.index()] = true;
            }
        }

        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn different_seeds_deal_differently() {
        let a = Table::deal(&mut SmallRng::seed_from_u64(1));
        let b = Table::deal(&mut SmallRng::seed_from_u64(2));

        assert_ne!(a.pile(PileId::Stock), b.pile(PileId::Stock));
    }

    #[test]
    fn draw_through_stock_then_recycle() {
        let mut table = dealt();
        let first = table.top(PileId::Stock).unwrap();

        for _ in 0..24 {
            assert!(matches!(table.draw(), DrawOutcome::Drawn(_)));
        }
        assert!(table.pile(PileId::Stock).is_empty());
        assert_eq!(table.pile(PileId::Waste).len(), 24);

        assert_eq!(table.draw(), DrawOutcome::Recycled);

        assert!(table.pile(PileId::Waste).is_empty());
        assert_eq!(table.pile(PileId::Stock).len(), 24);
        assert!(table.pile(PileId::Stock).iter().all(|&id| !table.card(id).face_up));
        assert_eq!(table.draw(), DrawOutcome::Drawn(first));
    }

    #[test]
    fn draw_with_nothing_left_is_a_no_op() {
        let mut table = Table::sorted();
        for suit in Suit::ALL {
            for rank in 1..=13 {
                table.place(suit, rank, PileId::Tableau(0), true);
            }
        }

        assert_eq!(table.draw(), DrawOutcome::Empty);
    }

    #[test]
    fn take_run_respects_pile_kind() {
        let mut table = Table::sorted();
        table.place(Suit::Spades, 9, PileId::Tableau(0), false);
        table.place(Suit::Hearts, 8, PileId::Tableau(0), true);
        table.place(Suit::Clubs, 7, PileId::Tableau(0), true);
        table.place(Suit::Diamonds, 3, PileId::Waste, true);
        table.place(Suit::Diamonds, 4, PileId::Waste, true);

        assert_eq!(table.take_run(PileId::Tableau(0), 0), Err(GameError::NothingToPick));
        assert_eq!(table.take_run(PileId::Waste, 0), Err(GameError::NothingToPick));
        assert_eq!(table.take_run(PileId::Stock, 0), Err(GameError::NothingToPick));
        assert_eq!(table.take_run(PileId::Tableau(3), 0), Err(GameError::NothingToPick));

        let run = table.take_run(PileId::Tableau(0), 1).unwrap();
        assert_eq!(run.as_slice(), &[CardId::of(Suit::Hearts, 8), CardId::of(Suit::Clubs, 7)]);
        assert_eq!(table.card_count() + run.len(), DECK_SIZE);

        assert!(table.flip_top_if_needed(PileId::Tableau(0)));
        assert!(!table.flip_top_if_needed(PileId::Tableau(0)));
    }

    #[test]
    fn foundations_take_single_cards_only() {
        let mut table = Table::sorted();
        let ace = table.place(Suit::Hearts, 1, PileId::Waste, true);
        let king = table.place(Suit::Spades, 13, PileId::Tableau(2), true);

        assert_eq!(table.accepting_foundation(ace), Some(PileId::Foundation(0)));
        assert!(!table.accepts(PileId::Foundation(0), ace, 2));
        assert!(table.accepts(PileId::Tableau(5), king, 3));
        assert!(!table.accepts(PileId::Waste, ace, 1));
        assert_eq!(table.accepting_foundation(king), None);
    }

    #[test]
    fn full_foundations_win() {
        let mut table = Table::sorted();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            for rank in 1..=13 {
                table.place(suit, rank, PileId::Foundation(i as u8), true);
            }
        }

        assert!(table.is_won());
        assert_eq!(table.card_count(), DECK_SIZE);
    }
}
