//! External sources consulted while building a ranking.
//!
//! Each source module works on the discovered URL list and returns one
//! value per URL, in input order, so the aggregator can join the results
//! by position.
//!
//! # Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Advent calendar | [`calendar`] | HTML scraping | Entry discovery and article titles |
//! | Hatena Bookmark | [`hatena`] | Bulk count API | One request for every URL |
//! | Qiita | [`qiita`] | Stockers API | Paged, authenticated, Qiita items only |
//!
//! All per-URL fetches of one source run concurrently and the first failure
//! aborts the batch.

pub mod calendar;
pub mod hatena;
pub mod qiita;
