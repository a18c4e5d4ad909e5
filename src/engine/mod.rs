pub mod apy;
pub mod ordering;
pub mod portfolio;
pub mod positions;
pub mod registry;
pub mod swaps;
