pub mod clamm;
