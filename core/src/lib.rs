//! Game-state engines for a small browser minigame collection.
//!
//! Every game implements [`Game`]; a [`GameManager`] hosts one at a time and
//! forwards frames and input to it. Drawing goes through [`Surface`], so the
//! engines never touch the DOM.

pub use error::*;
pub use lifecycle::*;
pub use manager::*;
pub use minesweeper::Minesweeper;
pub use solitaire::Solitaire;
pub use surface::*;
pub use timer::*;
pub use types::*;

mod error;
mod lifecycle;
mod manager;
pub mod minesweeper;
pub mod solitaire;
mod surface;
mod timer;
mod types;
