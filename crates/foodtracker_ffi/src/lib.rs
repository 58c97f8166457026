//! Flutter bridge surface over `foodtracker_core`.

pub mod api;
