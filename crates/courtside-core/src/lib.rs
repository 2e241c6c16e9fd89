// Library root: scorekeeping core for a live basketball match.
//
// The `game` module holds the roster adapters and the presenter that drives
// scoring and substitutions; `db` and `import` provide the SQLite-backed
// storage the presenter is wired to.

pub mod config;
pub mod db;
pub mod game;
pub mod import;
pub mod model;
pub mod storage;
