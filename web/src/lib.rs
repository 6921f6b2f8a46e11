use anyhow::{Context, anyhow};
use clap::Parser;
use wasm_bindgen::prelude::*;

mod app;
mod canvas;
mod utils;

/// Options read from the location hash, e.g. `#minesweeper&--level=hard&-vv`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// Game to open instead of the lobby
    game: Option<String>,

    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Minesweeper difficulty: easy, medium or hard
    #[arg(short, long)]
    level: Option<String>,
}

impl Args {
    pub(crate) fn from_hash(hash: &str) -> anyhow::Result<Self> {
        Ok(Self::try_parse_from(hash.split(['#', '&']))?)
    }

    /// The game id to route to; `None` (or `lobby`) shows the lobby.
    pub(crate) fn route(&self) -> Option<&str> {
        self.game.as_deref().filter(|id| *id != "lobby" && !id.is_empty())
    }

    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }
}

fn init() -> anyhow::Result<()> {
    use gloo::utils::{document, window};

    let location_hash = window().location().hash().unwrap_or_default();
    let args = Args::from_hash(&location_hash).context("Could not parse args")?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level)
            .map_err(|err| anyhow!("Error initializing logger: {}", err))?;
    }
    log::debug!("args: {:?}", args);

    let root = document()
        .get_element_by_id("app")
        .context("Could not find id=\"app\" element")?;

    log::debug!("App started");
    let props = app::ShellProps {
        route: args.route().map(String::from),
        seed: args.seed(),
        level: args.level().map(String::from),
    };
    yew::Renderer::<app::Shell>::with_root_and_props(root, props).render();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    init().map_err(|err| JsValue::from_str(&format!("{:#}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_opens_lobby() {
        let args = Args::from_hash("").unwrap();

        assert_eq!(args.route(), None);
        assert_eq!(args.seed(), None);
    }

    #[test]
    fn hash_carries_game_and_flags() {
        let args = Args::from_hash("#minesweeper&--level=hard&--seed=42&-vv").unwrap();

        assert_eq!(args.route(), Some("minesweeper"));
        assert_eq!(args.level(), Some("hard"));
        assert_eq!(args.seed(), Some(42));
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn lobby_route_is_not_a_game() {
        let args = Args::from_hash("#lobby").unwrap();

        assert_eq!(args.route(), None);
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(Args::from_hash("#solitaire&--seed=abc").is_err());
    }
}
