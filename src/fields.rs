//! Column identifiers and their display attributes.
//!
//! The board is built from a small closed set of workflow stages. Each stage
//! has a stable kebab-case identifier (used by serde, clap and as drop-target
//! ids), a display title and a brand colour.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Workflow stage a task can sit in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    Ideias,
    AFazer,
    Fazendo,
    Feito,
}

impl ColumnId {
    /// All columns in board order.
    pub const ALL: [ColumnId; 4] = [
        ColumnId::Ideias,
        ColumnId::AFazer,
        ColumnId::Fazendo,
        ColumnId::Feito,
    ];

    /// Stable identifier, also used as the column's drop-target id.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Ideias => "ideias",
            ColumnId::AFazer => "a-fazer",
            ColumnId::Fazendo => "fazendo",
            ColumnId::Feito => "feito",
        }
    }

    /// Human readable title shown in the column header.
    pub fn title(self) -> &'static str {
        match self {
            ColumnId::Ideias => "Ideias",
            ColumnId::AFazer => "A Fazer",
            ColumnId::Fazendo => "Fazendo",
            ColumnId::Feito => "Feito",
        }
    }

    /// Brand colour as an `(r, g, b)` triple.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColumnId::Ideias => (0x7B, 0x61, 0xFF),  // Purple
            ColumnId::AFazer => (0xFF, 0xCB, 0x1F),  // Yellow
            ColumnId::Fazendo => (0x49, 0xAA, 0xFF), // Blue
            ColumnId::Feito => (0x55, 0xB9, 0x38),   // Green
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BoardError::UnknownColumn { id: s.to_string() })
    }
}
