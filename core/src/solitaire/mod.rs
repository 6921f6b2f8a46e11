use std::collections::BTreeSet;
use std::mem;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub use card::*;
pub use layout::TableLayout;
pub use rules::{can_move_to_foundation, can_move_to_tableau};
pub use table::*;

use crate::*;

mod card;
mod layout;
mod render;
mod rules;
mod table;

/// Pointer travel beyond which a press counts as a drag.
pub const TAP_SLOP_PX: f64 = 6.;
/// Presses shorter than this may be taps.
pub const TAP_MAX_MS: f64 = 220.;
pub const DOUBLE_TAP_MS: f64 = 350.;

const SETTLE_BASE: f64 = 0.0008;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    NoChange,
    Returned,
    Drawn,
    Recycled,
    Moved,
    Won,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// What a press landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pick {
    Stock,
    Run { pile: PileId, index: usize },
    EmptyTableau(PileId),
}

#[derive(Clone, Debug)]
pub struct Drag {
    pub origin: PileId,
    pub cards: Run,
    grab: Point,
    start: Point,
    /// Latest pointer position, to re-anchor the run after a resize.
    pointer: Point,
    started_at: f64,
    moved: bool,
}

#[derive(Clone, Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Holding(Drag),
}

#[derive(Copy, Clone, Debug)]
struct Tap {
    card: CardId,
    pile: PileId,
    at: f64,
}

pub struct Solitaire {
    table: Table,
    layout: TableLayout,
    drag: DragState,
    animating: BTreeSet<CardId>,
    moves: u32,
    won: bool,
    last_tap: Option<Tap>,
    rng: SmallRng,
}

impl Default for Solitaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Solitaire {
    pub const ID: &'static str = "solitaire";

    pub fn new() -> Self {
        let mut rng = SmallRng::seed_from_u64(0);
        Self {
            table: Table::deal(&mut rng),
            layout: TableLayout::default(),
            drag: DragState::Idle,
            animating: BTreeSet::new(),
            moves: 0,
            won: false,
            last_tap: None,
            rng,
        }
    }

    pub fn meta() -> GameMeta {
        GameMeta {
            id: Self::ID,
            name: "Klondike Solitaire",
            description: "Standard Klondike: drag to move, tap a card to send it to a foundation.",
            create: || -> Box<dyn Game> { Box::new(Self::new()) },
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Cards on the table plus any held by a drag; always a full deck.
    pub fn card_count(&self) -> usize {
        let held = match &self.drag {
            DragState::Idle => 0,
            DragState::Holding(drag) => drag.cards.len(),
        };
        self.table.card_count() + held
    }

    pub fn is_animating(&self) -> bool {
        !self.animating.is_empty()
    }

    fn deal(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.table = Table::deal(&mut self.rng);
        self.drag = DragState::Idle;
        self.animating.clear();
        self.moves = 0;
        self.won = false;
        self.last_tap = None;
        self.snap_all(false);
    }

    /// Points every resting card at its slot, either instantly or through the animator.
    fn snap_all(&mut self, animate: bool) {
        let layout = self.layout;
        for pile in PileId::all() {
            let origin = layout.pile_origin(pile);
            let mut y = origin.y;
            for (i, id) in self.table.pile(pile).to_vec().into_iter().enumerate() {
                let at = match pile {
                    PileId::Waste => Point::new(origin.x + layout.waste_offset(i), origin.y),
                    PileId::Tableau(_) => {
                        let at = Point::new(origin.x, y);
                        y += if self.table.card(id).face_up {
                            layout.stack_gap
                        } else {
                            layout.face_down_gap()
                        };
                        at
                    }
                    PileId::Stock | PileId::Foundation(_) => origin,
                };
                let card = self.table.card_mut(id);
                if animate {
                    card.target = at;
                    self.animating.insert(id);
                } else {
                    card.snap(at);
                    self.animating.remove(&id);
                }
            }
        }
    }

    /// Draws from the stock, or recycles the waste when the stock is empty.
    pub fn draw(&mut self) -> MoveOutcome {
        if self.won || matches!(self.drag, DragState::Holding(_)) {
            return MoveOutcome::NoChange;
        }
        let outcome = match self.table.draw() {
            DrawOutcome::Drawn(_) => MoveOutcome::Drawn,
            DrawOutcome::Recycled => MoveOutcome::Recycled,
            DrawOutcome::Empty => return MoveOutcome::NoChange,
        };
        self.moves += 1;
        self.snap_all(true);
        outcome
    }

    /// Moves the run starting at `index` of `from` onto `to`, if legal.
    pub fn move_run(&mut self, from: PileId, index: usize, to: PileId) -> Result<MoveOutcome> {
        if self.won {
            return Err(GameError::AlreadyEnded);
        }
        let run = self.table.take_run(from, index)?;
        if from == to || !self.table.accepts(to, run[0], run.len()) {
            self.table.put_run(from, &run);
            return Err(GameError::IllegalMove);
        }
        Ok(self.complete_move(from, to, &run))
    }

    /// Sends the top card of `pile` to whichever foundation takes it.
    pub fn auto_to_foundation(&mut self, pile: PileId) -> Result<MoveOutcome> {
        if self.won {
            return Err(GameError::AlreadyEnded);
        }
        let id = self.table.top(pile).ok_or(GameError::NothingToPick)?;
        let target = self
            .table
            .accepting_foundation(id)
            .ok_or(GameError::IllegalMove)?;
        let index = self.table.pile(pile).len() - 1;
        self.move_run(pile, index, target)
    }

    fn complete_move(&mut self, from: PileId, to: PileId, run: &[CardId]) -> MoveOutcome {
        self.table.put_run(to, run);
        self.moves += 1;
        if self.table.flip_top_if_needed(from) {
            self.moves += 1;
        }
        self.snap_all(true);
        log::trace!("moved {} card(s) {:?} -> {:?}", run.len(), from, to);

        if self.table.is_won() {
            log::debug!("solved in {} moves", self.moves);
            self.won = true;
            MoveOutcome::Won
        } else {
            MoveOutcome::Moved
        }
    }

    /// Resolves what a press at `p` grabs. Stock beats waste beats foundations
    /// beats tableaus.
    pub fn pick_at(&self, p: Point) -> Option<Pick> {
        let layout = &self.layout;
        if layout.slot_rect(PileId::Stock).contains(p) {
            return Some(Pick::Stock);
        }

        for pile in std::iter::once(PileId::Waste).chain(PileId::foundations()) {
            let cards = self.table.pile(pile);
            if let Some(&top) = cards.last()
                && layout.card_rect(self.table.card(top).pos).contains(p)
            {
                return Some(Pick::Run {
                    pile,
                    index: cards.len() - 1,
                });
            }
        }

        for pile in PileId::tableaus() {
            let cards = self.table.pile(pile);
            for (index, &id) in cards.iter().enumerate().rev() {
                let card = self.table.card(id);
                if !card.face_up {
                    break;
                }
                let visible = if index + 1 == cards.len() {
                    layout.card_h
                } else {
                    layout.stack_gap
                };
                if Rect::at(card.pos, layout.card_w, visible + 6.).contains(p) {
                    return Some(Pick::Run { pile, index });
                }
            }
            if cards.is_empty() && layout.slot_rect(pile).contains(p) {
                return Some(Pick::EmptyTableau(pile));
            }
        }

        None
    }

    /// Where a run released at `p` would land. The first tableau under the
    /// pointer decides, even when it refuses the run.
    pub fn drop_target(&self, p: Point, run: &[CardId]) -> Option<PileId> {
        let lead = *run.first()?;
        let layout = &self.layout;

        if run.len() == 1 {
            let foundation = PileId::foundations().find(|&f| {
                layout.slot_rect(f).contains(p) && self.table.accepts(f, lead, 1)
            });
            if foundation.is_some() {
                return foundation;
            }
        }

        for pile in PileId::tableaus() {
            let zone = match self.table.top_card(pile) {
                None => layout.slot_rect(pile),
                Some(top) => Rect::at(
                    top.pos,
                    layout.card_w,
                    layout.card_h + (layout.stack_gap * 0.6).floor(),
                ),
            };
            if zone.contains(p) {
                return self
                    .table
                    .accepts(pile, lead, run.len())
                    .then_some(pile);
            }
        }

        None
    }

    fn follow_pointer(&mut self, p: Point) {
        let DragState::Holding(drag) = &self.drag else {
            return;
        };
        let base = Point::new(p.x - drag.grab.x, p.y - drag.grab.y);
        let gap = self.layout.stack_gap;
        for (i, &id) in drag.cards.iter().enumerate() {
            self.table
                .card_mut(id)
                .snap(Point::new(base.x, base.y + i as f64 * gap));
        }
    }

    fn start_drag(&mut self, pile: PileId, index: usize, event: &PointerEvent) -> Response {
        let cards = match self.table.take_run(pile, index) {
            Ok(cards) => cards,
            Err(err) => {
                log::trace!("pick {:?}[{}] ignored: {}", pile, index, err);
                return Response::NONE;
            }
        };
        for id in &cards {
            self.animating.remove(id);
        }

        let lead = self.table.card(cards[0]).pos;
        self.drag = DragState::Holding(Drag {
            origin: pile,
            cards,
            grab: Point::new(event.x - lead.x, event.y - lead.y),
            start: event.point(),
            pointer: event.point(),
            started_at: event.timestamp,
            moved: false,
        });
        self.follow_pointer(event.point());
        Response::changed(true)
    }

    fn finish_tap(&mut self, drag: Drag, at: f64) -> MoveOutcome {
        let card = drag.cards[0];
        self.table.put_run(drag.origin, &drag.cards);

        // Double taps are only logged; every tap already tries the foundation.
        let double = self.last_tap.is_some_and(|last| {
            last.card == card && last.pile == drag.origin && at - last.at < DOUBLE_TAP_MS
        });
        if double {
            log::trace!("double tap on {}", self.table.card(card).label());
        }
        self.last_tap = Some(Tap {
            card,
            pile: drag.origin,
            at,
        });

        match self.auto_to_foundation(drag.origin) {
            Ok(outcome) => outcome,
            Err(_) => {
                self.snap_all(true);
                MoveOutcome::Returned
            }
        }
    }

    fn finish_drop(&mut self, drag: Drag, p: Point) -> MoveOutcome {
        match self.drop_target(p, &drag.cards) {
            Some(target) if target != drag.origin => {
                self.complete_move(drag.origin, target, &drag.cards)
            }
            _ => self.return_run(drag),
        }
    }

    fn return_run(&mut self, drag: Drag) -> MoveOutcome {
        self.table.put_run(drag.origin, &drag.cards);
        self.snap_all(true);
        MoveOutcome::Returned
    }
}

impl Game for Solitaire {
    fn start(&mut self, options: &StartOptions) {
        log::debug!("solitaire deal, seed {}", options.seed);
        self.deal(options.seed);
    }

    fn stop(&mut self) {
        if let DragState::Holding(drag) = mem::take(&mut self.drag) {
            self.return_run(drag);
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.layout = TableLayout::fit(width, height);
        self.snap_all(false);
        let p = match &self.drag {
            DragState::Holding(drag) => drag.pointer,
            DragState::Idle => return,
        };
        self.follow_pointer(p);
    }

    fn update(&mut self, dt: f64) {
        if self.animating.is_empty() {
            return;
        }
        let k = 1. - SETTLE_BASE.powf(dt * 60.);
        let mut settled = Vec::new();
        for &id in &self.animating {
            if self.table.card_mut(id).step(k) {
                settled.push(id);
            }
        }
        for id in settled {
            self.animating.remove(&id);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        render::draw(self, surface);
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> Response {
        if self.won || matches!(self.drag, DragState::Holding(_)) {
            return Response::NONE;
        }
        match self.pick_at(event.point()) {
            Some(Pick::Stock) => Response::changed(self.draw().has_update()),
            Some(Pick::Run { pile, index }) => self.start_drag(pile, index, event),
            Some(Pick::EmptyTableau(_)) | None => Response::NONE,
        }
    }

    fn pointer_move(&mut self, event: &PointerEvent) -> Response {
        let DragState::Holding(drag) = &mut self.drag else {
            return Response::NONE;
        };
        if event.point().distance_to(drag.start) > TAP_SLOP_PX {
            drag.moved = true;
        }
        drag.pointer = event.point();
        self.follow_pointer(event.point());
        Response::changed(true)
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> Response {
        let DragState::Holding(drag) = mem::take(&mut self.drag) else {
            return Response::NONE;
        };
        let is_tap =
            !drag.moved && event.timestamp - drag.started_at < TAP_MAX_MS && drag.cards.len() == 1;

        let outcome = if is_tap {
            self.finish_tap(drag, event.timestamp)
        } else {
            self.finish_drop(drag, event.point())
        };
        Response::changed(outcome.has_update())
    }

    fn pointer_cancel(&mut self, _event: &PointerEvent) -> Response {
        match mem::take(&mut self.drag) {
            DragState::Holding(drag) => Response::changed(self.return_run(drag).has_update()),
            DragState::Idle => Response::NONE,
        }
    }

    fn key_down(&mut self, key: &str) -> Response {
        match key {
            "d" | "D" | " " => Response::changed(self.draw().has_update()),
            _ => Response::NONE,
        }
    }

    fn hud(&self) -> Hud {
        let right = if self.won {
            "Solved!".into()
        } else {
            format!(
                "Stock: {}   Waste: {}",
                self.table.pile(PileId::Stock).len(),
                self.table.pile(PileId::Waste).len()
            )
        };
        Hud {
            left: format!("Moves: {}", self.moves),
            right,
        }
    }

    fn rules_html(&self) -> &'static str {
        RULES_HTML
    }
}

const RULES_HTML: &str = r#"
<p><b>Goal:</b> move every card onto the four foundations in the top right, by suit from A to K.</p>
<p><b>Controls:</b></p>
<ul>
  <li>Stock: click to turn one card onto the waste; click the empty stock to recycle the waste.</li>
  <li>Tableau: build down in alternating colors; only a K may fill an empty column.</li>
  <li>Foundation: build up by suit from A to K.</li>
  <li><b>Tip:</b> tap a movable card to send it to a foundation automatically.</li>
</ul>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;

    const W: f64 = 800.;
    const H: f64 = 600.;

    fn dealt(seed: u64) -> Solitaire {
        let mut game = Solitaire::new();
        game.resize(W, H);
        game.start(&StartOptions::with_seed(seed));
        game
    }

    fn arranged(table: Table) -> Solitaire {
        let mut game = dealt(0);
        game.table = table;
        game.snap_all(false);
        game
    }

    /// A point on the visible strip of a resting card.
    fn grip(game: &Solitaire, id: CardId) -> Point {
        let pos = game.table().card(id).pos;
        Point::new(pos.x + game.layout().card_w / 2., pos.y + 8.)
    }

    fn drag(game: &mut Solitaire, from: Point, to: Point) -> Response {
        game.pointer_down(&PointerEvent::mouse(from.x, from.y, 0, 0.));
        game.pointer_move(&PointerEvent::mouse(to.x, to.y, 0, 100.));
        game.pointer_up(&PointerEvent::mouse(to.x, to.y, 0, 400.))
    }

    fn tap(game: &mut Solitaire, at: Point, ts: f64) -> Response {
        game.pointer_down(&PointerEvent::touch(at.x, at.y, ts));
        game.pointer_up(&PointerEvent::touch(at.x, at.y, ts + 80.))
    }

    /// 7♥ on tableau 0; a face-down card under 6♠ and 6♥ on tableau 1 and 2.
    fn sevens_and_sixes() -> Table {
        let mut table = Table::sorted();
        table.place(Suit::Hearts, 7, PileId::Tableau(0), true);
        table.place(Suit::Clubs, 2, PileId::Tableau(1), false);
        table.place(Suit::Spades, 6, PileId::Tableau(1), true);
        table.place(Suit::Hearts, 6, PileId::Tableau(2), true);
        table
    }

    #[test]
    fn fresh_deal_hud() {
        let game = dealt(5);

        assert_eq!(game.hud().left, "Moves: 0");
        assert_eq!(game.hud().right, "Stock: 24   Waste: 0");
        assert_eq!(game.card_count(), DECK_SIZE);
    }

    #[test]
    fn stock_click_draws_then_recycles() {
        let mut game = dealt(5);
        let stock = game.layout().slot_rect(PileId::Stock).center();

        for _ in 0..24 {
            game.pointer_down(&PointerEvent::mouse(stock.x, stock.y, 0, 0.));
            game.pointer_up(&PointerEvent::mouse(stock.x, stock.y, 0, 10.));
        }
        assert_eq!(game.hud().right, "Stock: 0   Waste: 24");

        assert!(game.pointer_down(&PointerEvent::mouse(stock.x, stock.y, 0, 0.)).changed);

        assert_eq!(game.table().pile(PileId::Waste).len(), 0);
        let stock_cards = game.table().pile(PileId::Stock);
        assert_eq!(stock_cards.len(), 24);
        assert!(stock_cards.iter().all(|&id| !game.table().card(id).face_up));
        assert_eq!(game.moves(), 25);
    }

    #[test]
    fn empty_stock_and_waste_draw_is_a_no_op() {
        let mut table = Table::sorted();
        for suit in Suit::ALL {
            for rank in 1..=13 {
                table.place(suit, rank, PileId::Tableau(6), true);
            }
        }
        let mut game = arranged(table);

        assert_eq!(game.draw(), MoveOutcome::NoChange);
        assert_eq!(game.key_down("d"), Response::NONE);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn drag_black_six_onto_red_seven() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Spades, 6);
        let seven = CardId::of(Suit::Hearts, 7);
        let onto = game.layout().card_rect(game.table().card(seven).pos).center();

        let from = grip(&game, six);

        assert!(drag(&mut game, from, onto).changed);

        assert_eq!(game.table().pile(PileId::Tableau(0)), &[seven, six]);
        let exposed = game.table().top_card(PileId::Tableau(1)).unwrap();
        assert!(exposed.face_up);
        // the move plus the flip
        assert_eq!(game.moves(), 2);
    }

    #[test]
    fn illegal_drop_returns_to_origin() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Hearts, 6);
        let seven = CardId::of(Suit::Hearts, 7);
        let onto = game.layout().card_rect(game.table().card(seven).pos).center();

        let from = grip(&game, six);
        drag(&mut game, from, onto);

        assert_eq!(game.table().pile(PileId::Tableau(2)), &[six]);
        assert_eq!(game.table().pile(PileId::Tableau(0)), &[seven]);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.card_count(), DECK_SIZE);
    }

    #[test]
    fn drop_in_empty_space_returns_to_origin() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Spades, 6);

        let from = grip(&game, six);
        drag(&mut game, from, Point::new(W - 5., H - 5.));

        assert_eq!(game.table().top(PileId::Tableau(1)), Some(six));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn deck_is_conserved_mid_drag() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Spades, 6);
        let from = grip(&game, six);

        game.pointer_down(&PointerEvent::mouse(from.x, from.y, 0, 0.));
        game.pointer_move(&PointerEvent::mouse(from.x + 50., from.y + 50., 0, 30.));

        assert!(
            matches!(game.drag(), DragState::Holding(drag) if drag.origin == PileId::Tableau(1))
        );
        assert_eq!(game.table().card_count(), DECK_SIZE - 1);
        assert_eq!(game.card_count(), DECK_SIZE);
        let held = Point::new(from.x + 50. - game.layout().card_w / 2., from.y + 42.);
        assert_eq!(game.table().card(six).pos, held);

        game.pointer_cancel(&PointerEvent::mouse(from.x, from.y, 0, 40.));
        assert_eq!(game.table().top(PileId::Tableau(1)), Some(six));
        assert_eq!(game.card_count(), DECK_SIZE);
    }

    #[test]
    fn run_moves_with_its_lead_card() {
        let mut table = Table::sorted();
        table.place(Suit::Spades, 9, PileId::Tableau(3), true);
        table.place(Suit::Hearts, 8, PileId::Tableau(4), true);
        let seven = table.place(Suit::Clubs, 7, PileId::Tableau(4), true);
        let mut game = arranged(table);
        let eight = CardId::of(Suit::Hearts, 8);
        let nine = CardId::of(Suit::Spades, 9);
        let onto = game.layout().card_rect(game.table().card(nine).pos).center();

        let from = grip(&game, eight);
        drag(&mut game, from, onto);

        assert_eq!(game.table().pile(PileId::Tableau(3)), &[nine, eight, seven]);
        assert!(game.table().pile(PileId::Tableau(4)).is_empty());
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn face_down_cards_cannot_be_picked() {
        let mut game = arranged(sevens_and_sixes());
        let hidden = CardId::of(Suit::Clubs, 2);
        let p = grip(&game, hidden);

        assert_eq!(game.pointer_down(&PointerEvent::mouse(p.x, p.y, 0, 0.)), Response::NONE);
        assert!(matches!(game.drag(), DragState::Idle));
    }

    #[test]
    fn empty_tableau_is_not_draggable() {
        let mut game = arranged(sevens_and_sixes());
        let slot = game.layout().slot_rect(PileId::Tableau(5)).center();

        assert_eq!(game.pick_at(slot), Some(Pick::EmptyTableau(PileId::Tableau(5))));
        assert_eq!(game.pointer_down(&PointerEvent::mouse(slot.x, slot.y, 0, 0.)), Response::NONE);
    }

    #[test]
    fn only_top_of_waste_is_picked() {
        let mut table = Table::sorted();
        table.place(Suit::Diamonds, 9, PileId::Waste, true);
        table.place(Suit::Diamonds, 10, PileId::Waste, true);
        let top = table.place(Suit::Diamonds, 11, PileId::Waste, true);
        let game = arranged(table);

        let waste = game.layout().pile_origin(PileId::Waste);
        // left edge of the first fanned card, which the top card does not cover
        let under = Point::new(waste.x + 2., waste.y + 10.);
        assert_eq!(game.pick_at(under), None);

        let on_top = grip(&game, top);
        assert_eq!(game.pick_at(on_top), Some(Pick::Run { pile: PileId::Waste, index: 2 }));
    }

    #[test]
    fn tap_sends_ace_to_foundation() {
        let mut table = Table::sorted();
        let ace = table.place(Suit::Hearts, 1, PileId::Waste, true);
        let mut game = arranged(table);

        let at = grip(&game, ace);

        assert!(tap(&mut game, at, 0.).changed);

        assert_eq!(game.table().top(PileId::Foundation(0)), Some(ace));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn tap_on_stuck_card_returns_it() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Hearts, 6);

        let at = grip(&game, six);

        tap(&mut game, at, 0.);
        tap(&mut game, at, 200.);

        assert_eq!(game.table().pile(PileId::Tableau(2)), &[six]);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.card_count(), DECK_SIZE);
    }

    #[test]
    fn resize_mid_drag_keeps_run_under_pointer() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Spades, 6);
        let lead = game.table().card(six).pos;
        let p = grip(&game, six);
        let q = Point::new(p.x + 100., p.y + 150.);

        game.pointer_down(&PointerEvent::mouse(p.x, p.y, 0, 0.));
        game.pointer_move(&PointerEvent::mouse(q.x, q.y, 0, 50.));
        game.resize(1000., 700.);

        let expected = Point::new(q.x - (p.x - lead.x), q.y - (p.y - lead.y));
        assert_eq!(game.table().card(six).pos, expected);
    }

    #[test]
    fn slow_press_is_not_a_tap() {
        let mut table = Table::sorted();
        let ace = table.place(Suit::Hearts, 1, PileId::Tableau(0), true);
        let mut game = arranged(table);
        let p = grip(&game, ace);

        game.pointer_down(&PointerEvent::mouse(p.x, p.y, 0, 0.));
        game.pointer_up(&PointerEvent::mouse(p.x, p.y, 0, 500.));

        assert_eq!(game.table().top(PileId::Tableau(0)), Some(ace));
        assert_eq!(game.table().foundation_total(), 0);
    }

    #[test]
    fn foundation_refuses_runs() {
        let mut table = Table::sorted();
        table.place(Suit::Spades, 2, PileId::Tableau(0), true);
        table.place(Suit::Hearts, 1, PileId::Tableau(0), true);
        let mut game = arranged(table);

        assert_eq!(
            game.move_run(PileId::Tableau(0), 0, PileId::Foundation(0)),
            Err(GameError::IllegalMove)
        );
        assert_eq!(game.table().pile(PileId::Tableau(0)).len(), 2);
        assert_eq!(
            game.move_run(PileId::Tableau(0), 1, PileId::Foundation(0)),
            Ok(MoveOutcome::Moved)
        );
    }

    #[test]
    fn last_card_wins_and_freezes_input() {
        let mut table = Table::sorted();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            for rank in 1..=13 {
                table.place(suit, rank, PileId::Foundation(i as u8), true);
            }
        }
        let king = table.place(Suit::Clubs, 13, PileId::Waste, true);
        let mut game = arranged(table);

        let at = grip(&game, king);
        tap(&mut game, at, 0.);

        assert!(game.is_won());
        assert_eq!(game.hud().right, "Solved!");
        let stock = game.layout().slot_rect(PileId::Stock).center();
        assert_eq!(game.pointer_down(&PointerEvent::mouse(stock.x, stock.y, 0, 0.)), Response::NONE);
        assert_eq!(game.auto_to_foundation(PileId::Foundation(3)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn drawn_card_animates_into_place() {
        let mut game = dealt(3);
        game.draw();
        let id = game.table().top(PileId::Waste).unwrap();
        let target = game.layout().pile_origin(PileId::Waste);

        assert!(game.is_animating());
        assert_ne!(game.table().card(id).pos, target);

        for _ in 0..120 {
            game.update(1. / 60.);
        }

        assert!(!game.is_animating());
        assert_eq!(game.table().card(id).pos, target);
    }

    #[test]
    fn restart_discards_drag_and_moves() {
        let mut game = arranged(sevens_and_sixes());
        let six = CardId::of(Suit::Spades, 6);
        let p = grip(&game, six);
        game.pointer_down(&PointerEvent::mouse(p.x, p.y, 0, 0.));

        game.start(&StartOptions::with_seed(11));

        assert!(matches!(game.drag(), DragState::Idle));
        assert_eq!(game.moves(), 0);
        assert_eq!(game.card_count(), DECK_SIZE);
    }

    #[test]
    fn render_shows_win_overlay() {
        let mut table = Table::sorted();
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            for rank in 1..=13 {
                table.place(suit, rank, PileId::Foundation(i as u8), true);
            }
        }
        let mut game = arranged(table);
        game.won = true;

        let mut surface = RecordingSurface::default();
        game.render(&mut surface);

        assert!(surface.texts().contains(&"Solved!"));
        assert!(surface.texts().contains(&"K♠"));
    }
}
