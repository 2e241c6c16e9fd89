// Live match scorekeeping: stat accumulation, roster groups, substitutions.

pub mod presenter;
pub mod roster;
pub mod stat;
pub mod substitution;
pub mod view;
