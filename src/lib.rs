//! Cerebrus: pull request checks for TiddlyWiki.
//!
//! Checks a PR's changed paths against branch rules, validates its change
//! notes, and compares build sizes. Each check owns one section of a single
//! report comment on the PR.

pub mod build_size;
pub mod change_note;
pub mod cli;
pub mod comment;
pub mod config;
pub mod github;
pub mod report;
pub mod rules;
pub mod telemetry;
pub mod tiddler;
