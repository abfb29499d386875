//! Wire protocol.
//!
//! Requests arrive as `{"type": <tag>, "payload": <json>}` envelopes. The
//! envelope is decoded first and the payload only once the tag is known, so
//! an unknown tag can be skipped without failing the session.
//!
//! Responses are adjacently tagged the same way:
//!
//! | request tag         | response `type`  | payload                 |
//! |---------------------|------------------|-------------------------|
//! | `load-grid`         | `grid`           | `{"cells": [[int]]}`    |
//! | `get-components`    | `components`     | `[[cell]]`              |
//! | `get-pattern-count` | `pattern-count`  | int                     |
//! | `get-shortest-path` | `path`           | `[cell]` or `null`      |
//! | `get-weighted-path` | `path`           | `[cell]` or `null`      |
//! | `stop`              | none             |                         |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_core::{Cell, Grid};
use tessera_graph::Component;

/// A raw request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadGrid(Vec<Vec<i32>>),
    GetComponents,
    GetPatternCount,
    GetShortestPath(Vec<Cell>),
    GetWeightedPath(Vec<Cell>),
    Stop,
}

impl Request {
    pub const LOAD_GRID: &'static str = "load-grid";
    pub const GET_COMPONENTS: &'static str = "get-components";
    pub const GET_PATTERN_COUNT: &'static str = "get-pattern-count";
    pub const GET_SHORTEST_PATH: &'static str = "get-shortest-path";
    pub const GET_WEIGHTED_PATH: &'static str = "get-weighted-path";
    pub const STOP: &'static str = "stop";

    /// Decodes an envelope.
    ///
    /// Returns `Ok(None)` for unknown tags and an error when a known tag
    /// carries a payload of the wrong shape.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Self>, serde_json::Error> {
        let payload = &envelope.payload;
        let request = match envelope.kind.as_str() {
            Self::LOAD_GRID => Self::LoadGrid(Deserialize::deserialize(payload)?),
            Self::GET_COMPONENTS => Self::GetComponents,
            Self::GET_PATTERN_COUNT => Self::GetPatternCount,
            Self::GET_SHORTEST_PATH => Self::GetShortestPath(Deserialize::deserialize(payload)?),
            Self::GET_WEIGHTED_PATH => Self::GetWeightedPath(Deserialize::deserialize(payload)?),
            Self::STOP => Self::Stop,
            _ => return Ok(None),
        };
        Ok(Some(request))
    }

    /// Encodes this request as an envelope.
    pub fn to_envelope(&self) -> Result<Envelope, serde_json::Error> {
        let payload = match self {
            Self::LoadGrid(rows) => serde_json::to_value(rows)?,
            Self::GetShortestPath(cells) | Self::GetWeightedPath(cells) => {
                serde_json::to_value(cells)?
            }
            Self::GetComponents | Self::GetPatternCount | Self::Stop => Value::Null,
        };
        Ok(Envelope::new(self.tag(), payload))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::LoadGrid(_) => Self::LOAD_GRID,
            Self::GetComponents => Self::GET_COMPONENTS,
            Self::GetPatternCount => Self::GET_PATTERN_COUNT,
            Self::GetShortestPath(_) => Self::GET_SHORTEST_PATH,
            Self::GetWeightedPath(_) => Self::GET_WEIGHTED_PATH,
            Self::Stop => Self::STOP,
        }
    }
}

/// Server-to-client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Response {
    /// The grid that was just loaded.
    Grid(Grid),
    Components(Vec<Component>),
    /// `-1` until a grid has been loaded.
    PatternCount(i64),
    /// Cells from start to end, or `None` when the end is unreachable.
    Path(Option<Vec<Cell>>),
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Grid(_) => "grid",
            Self::Components(_) => "components",
            Self::PatternCount(_) => "pattern-count",
            Self::Path(_) => "path",
        }
    }
}
