use crate::*;

/// Longest frame step handed to [`Game::update`], in seconds.
pub const MAX_FRAME_DT: f64 = 0.033;

/// Registry entry describing a game and how to build it.
#[derive(Copy, Clone, Debug)]
pub struct GameMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub create: fn() -> Box<dyn Game>,
}

struct ActiveGame {
    meta: GameMeta,
    game: Box<dyn Game>,
}

/// Hosts at most one running game and forwards frames and input to it.
/// Knows nothing about any particular game's rules.
#[derive(Default)]
pub struct GameManager {
    registry: Vec<GameMeta>,
    current: Option<ActiveGame>,
    size: (f64, f64),
}

impl GameManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_games() -> Self {
        let mut manager = Self::new();
        manager.register(Minesweeper::meta());
        manager.register(Solitaire::meta());
        manager
    }

    /// Adds a game, replacing any earlier entry with the same id.
    pub fn register(&mut self, meta: GameMeta) {
        match self.registry.iter_mut().find(|known| known.id == meta.id) {
            Some(known) => *known = meta,
            None => self.registry.push(meta),
        }
    }

    /// Registered games in registration order.
    pub fn list_games(&self) -> impl Iterator<Item = &GameMeta> {
        self.registry.iter()
    }

    pub fn has_game(&self, id: &str) -> bool {
        self.registry.iter().any(|meta| meta.id == id)
    }

    pub fn current(&self) -> Option<&GameMeta> {
        self.current.as_ref().map(|active| &active.meta)
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Stops whatever runs now and starts a fresh instance of `id`.
    pub fn start(
        &mut self,
        id: &str,
        options: &StartOptions,
    ) -> std::result::Result<(), ManagerError> {
        let meta = *self
            .registry
            .iter()
            .find(|meta| meta.id == id)
            .ok_or_else(|| ManagerError::UnknownGame(id.to_string()))?;

        self.stop();

        let mut game = (meta.create)();
        let (width, height) = self.size;
        game.resize(width, height);
        game.start(options);
        log::info!("started {} ({})", meta.id, meta.name);

        self.current = Some(ActiveGame { meta, game });
        Ok(())
    }

    /// Re-runs `start` on the active game. Returns false when nothing is running.
    pub fn restart(&mut self, options: &StartOptions) -> bool {
        let Some(active) = self.current.as_mut() else {
            return false;
        };
        log::debug!("restarting {}", active.meta.id);
        active.game.start(options);
        true
    }

    pub fn stop(&mut self) {
        if let Some(mut active) = self.current.take() {
            active.game.stop();
            log::debug!("stopped {}", active.meta.id);
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = (width, height);
        if let Some(active) = self.current.as_mut() {
            active.game.resize(width, height);
        }
    }

    /// One animation frame: advance by `dt` seconds, clamped, then draw.
    pub fn tick(&mut self, dt: f64, surface: &mut dyn Surface) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        active.game.update(dt.clamp(0., MAX_FRAME_DT));
        active.game.render(surface);
    }

    fn dispatch(&mut self, f: impl FnOnce(&mut dyn Game) -> Response) -> Response {
        match self.current.as_mut() {
            Some(active) => f(active.game.as_mut()),
            None => Response::NONE,
        }
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Response {
        self.dispatch(|game| game.pointer_down(event))
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> Response {
        self.dispatch(|game| game.pointer_move(event))
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Response {
        self.dispatch(|game| game.pointer_up(event))
    }

    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> Response {
        self.dispatch(|game| game.pointer_cancel(event))
    }

    pub fn context_menu(&mut self, event: &PointerEvent) -> Response {
        self.dispatch(|game| game.context_menu(event))
    }

    pub fn key_down(&mut self, key: &str) -> Response {
        self.dispatch(|game| game.key_down(key))
    }

    pub fn fire_timer(&mut self, token: TimerToken) -> Response {
        self.dispatch(|game| game.fire_timer(token))
    }

    pub fn hud(&self) -> Hud {
        self.current
            .as_ref()
            .map(|active| active.game.hud())
            .unwrap_or_default()
    }

    pub fn rules_html(&self) -> &'static str {
        self.current
            .as_ref()
            .map_or("", |active| active.game.rules_html())
    }

    pub fn levels(&self) -> &'static [&'static str] {
        match &self.current {
            Some(active) => active.game.levels(),
            None => &[],
        }
    }

    pub fn supports_flag_mode(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|active| active.game.supports_flag_mode())
    }

    pub fn toggle_flag_mode(&mut self) -> Option<bool> {
        self.current.as_mut()?.game.toggle_flag_mode()
    }
}
