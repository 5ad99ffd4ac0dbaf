//! Shared utilities for `taskboard`.

pub mod time;
