//! **blockmaze** generates perfect mazes on a grid of wall blocks with a steppable
//! recursive backtracker, so that a renderer can animate the walls being carved away.

pub mod analysis;
pub mod config;
pub mod coordinates;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_traits;
pub mod units;
