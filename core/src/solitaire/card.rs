use serde::{Deserialize, Serialize};

use crate::Point;

pub type Rank = u8;

pub const ACE: Rank = 1;
pub const KING: Rank = 13;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardColor {
    Red,
    Black,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    pub const fn color(self) -> CardColor {
        match self {
            Suit::Hearts | Suit::Diamonds => CardColor::Red,
            Suit::Spades | Suit::Clubs => CardColor::Black,
        }
    }

    const fn index(self) -> u8 {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Diamonds => 2,
            Suit::Clubs => 3,
        }
    }
}

pub fn rank_text(rank: Rank) -> String {
    match rank {
        ACE => "A".into(),
        11 => "J".into(),
        12 => "Q".into(),
        KING => "K".into(),
        n => format!("{}", n),
    }
}

/// Index of a card in the table's arena. The arena is always built in the same
/// order, so the id of a given suit and rank never changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u8);

impl CardId {
    pub const fn of(suit: Suit, rank: Rank) -> Self {
        Self(suit.index() * KING + (rank - 1))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub face_up: bool,
    /// Where the card is drawn right now.
    pub pos: Point,
    /// Where the card is heading; equal to `pos` once settled.
    pub target: Point,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            face_up: false,
            pos: Point::new(0., 0.),
            target: Point::new(0., 0.),
        }
    }

    pub const fn color(&self) -> CardColor {
        self.suit.color()
    }

    pub fn label(&self) -> String {
        format!("{}{}", rank_text(self.rank), self.suit.symbol())
    }

    pub fn snap(&mut self, to: Point) {
        self.pos = to;
        self.target = to;
    }

    /// Moves a fraction `k` of the way to the target. Returns true once settled.
    pub fn step(&mut self, k: f64) -> bool {
        let dx = self.target.x - self.pos.x;
        let dy = self.target.y - self.pos.y;
        if dx.abs() < 0.5 && dy.abs() < 0.5 {
            self.pos = self.target;
            return true;
        }
        self.pos.x += dx * k;
        self.pos.y += dy * k;
        false
    }
}

/// All 52 cards face-down, in [`CardId`] order.
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::new(suit, rank)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_matches_card_ids() {
        let deck = standard_deck();

        assert_eq!(deck.len(), 52);
        for card in &deck {
            assert_eq!(deck[CardId::of(card.suit, card.rank).index()], *card);
        }
    }

    #[test]
    fn labels_and_colors() {
        let card = Card::new(Suit::Hearts, 7);

        assert_eq!(card.label(), "7♥");
        assert_eq!(card.color(), CardColor::Red);
        assert_eq!(Card::new(Suit::Clubs, 12).label(), "Q♣");
        assert_eq!(Suit::Spades.color(), CardColor::Black);
    }

    #[test]
    fn step_settles_within_half_pixel() {
        let mut card = Card::new(Suit::Spades, ACE);
        card.target = Point::new(100., 0.);

        let mut steps = 0;
        while !card.step(0.5) {
            steps += 1;
            assert!(steps < 100);
        }

        assert_eq!(card.pos, card.target);
    }
}
