//! Combinatorial game value engine.
//!
//! Represents short partizan games as explicit trees of Left and Right
//! alternatives, encodes and decodes them in [combinatorial game
//! notation](crate::notation), decides partial-order relations between game
//! values, and reduces any game to its unique simplest representative via
//! [`Game::canonical_form`](crate::game::Game::canonical_form). On top of the
//! order oracle sit the algebraic operations: inverse, sum, outcome class,
//! companion, integer detection and extraction, and the Norton product.

#![warn(missing_docs)]

pub mod game;
pub mod notation;
pub mod parsing;

mod display;
