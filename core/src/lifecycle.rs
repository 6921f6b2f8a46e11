use serde::{Deserialize, Serialize};

use crate::{Point, Surface, TimerRequest, TimerToken};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerType {
    /// Maps the DOM `pointerType` string; anything unknown is treated as a mouse.
    pub fn from_dom(kind: &str) -> Self {
        match kind {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }

    pub const fn is_mouse(self) -> bool {
        matches!(self, Self::Mouse)
    }
}

/// Pointer input already translated into surface-local pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub pointer_type: PointerType,
    /// DOM button index: 0 primary, 1 middle, 2 secondary.
    pub button: i16,
    /// Milliseconds on the host's monotonic clock.
    pub timestamp: f64,
}

impl PointerEvent {
    pub const PRIMARY: i16 = 0;
    pub const SECONDARY: i16 = 2;

    pub const fn mouse(x: f64, y: f64, button: i16, timestamp: f64) -> Self {
        Self {
            x,
            y,
            pointer_type: PointerType::Mouse,
            button,
            timestamp,
        }
    }

    pub const fn touch(x: f64, y: f64, timestamp: f64) -> Self {
        Self {
            x,
            y,
            pointer_type: PointerType::Touch,
            button: Self::PRIMARY,
            timestamp,
        }
    }

    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Options handed to [`Game::start`] on every start and restart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StartOptions {
    /// Difficulty key, only meaningful to games that report [`Game::levels`].
    pub level: Option<String>,
    /// Seed for the game's random source.
    pub seed: u64,
    /// Whether the host believes input is coarse (touch-first).
    pub touch: bool,
}

impl StartOptions {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}

/// Two free-form status lines for the host's HUD.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub left: String,
    pub right: String,
}

/// What an input handler wants the host to know about.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub changed: bool,
    pub timer: Option<TimerRequest>,
}

impl Response {
    pub const NONE: Self = Self {
        changed: false,
        timer: None,
    };

    pub const fn changed(changed: bool) -> Self {
        Self {
            changed,
            timer: None,
        }
    }

    pub const fn schedule(timer: TimerRequest) -> Self {
        Self {
            changed: false,
            timer: Some(timer),
        }
    }
}

/// Lifecycle every hosted game implements.
///
/// `update` only advances clocks and animations and `render` takes `&self`;
/// all rule logic runs inside the input and timer handlers.
pub trait Game {
    fn start(&mut self, options: &StartOptions);
    fn stop(&mut self) {}
    fn resize(&mut self, width: f64, height: f64);
    fn update(&mut self, dt: f64);
    fn render(&self, surface: &mut dyn Surface);
    fn pointer_down(&mut self, event: &PointerEvent) -> Response;
    fn pointer_move(&mut self, event: &PointerEvent) -> Response;
    fn pointer_up(&mut self, event: &PointerEvent) -> Response;
    fn hud(&self) -> Hud;

    /// Pointer sequence aborted by the platform.
    fn pointer_cancel(&mut self, event: &PointerEvent) -> Response {
        self.pointer_up(event)
    }

    fn context_menu(&mut self, _event: &PointerEvent) -> Response {
        Response::NONE
    }

    fn key_down(&mut self, _key: &str) -> Response {
        Response::NONE
    }

    /// Called by the host when a [`TimerRequest`] elapses.
    fn fire_timer(&mut self, _token: TimerToken) -> Response {
        Response::NONE
    }

    fn rules_html(&self) -> &'static str {
        ""
    }

    /// Difficulty keys accepted in [`StartOptions::level`]; empty when the game has none.
    fn levels(&self) -> &'static [&'static str] {
        &[]
    }

    fn supports_flag_mode(&self) -> bool {
        false
    }

    /// Flips touch flag mode, returning the new state, or `None` when unsupported.
    fn toggle_flag_mode(&mut self) -> Option<bool> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pointer_types_fall_back_to_mouse() {
        assert_eq!(PointerType::from_dom("touch"), PointerType::Touch);
        assert_eq!(PointerType::from_dom("pen"), PointerType::Pen);
        assert_eq!(PointerType::from_dom(""), PointerType::Mouse);
    }

    #[test]
    fn start_options_builder_sets_level() {
        let options = StartOptions::with_seed(7).level("hard");

        assert_eq!(options.seed, 7);
        assert_eq!(options.level.as_deref(), Some("hard"));
        assert!(!options.touch);
    }
}
