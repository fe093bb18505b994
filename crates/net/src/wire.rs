//! Request bodies and filters for the REST endpoint

use std::fmt::Display;

use podium_core::{RoundId, Scores};
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct NewRound<'a> {
    pub name: &'a str,
    pub is_active: bool,
}

#[derive(Serialize)]
pub(crate) struct NewEntry<'a> {
    pub episode_id: &'a RoundId,
    pub name: &'a str,
    pub scores: Scores,
}

#[derive(Serialize)]
pub(crate) struct ActivePatch {
    pub is_active: bool,
}

#[derive(Serialize)]
pub(crate) struct NamePatch<'a> {
    pub name: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ScoresPatch<'a> {
    pub scores: &'a Scores,
}

/// PostgREST equality filter value
pub(crate) fn eq(value: impl Display) -> String {
    format!("eq.{}", value)
}
