//! Grid cell types

use serde::{Deserialize, Serialize};

/// Wall height in world units
pub const WALL_HEIGHT: f32 = 3.0;
pub const TOWER_HEIGHT: f32 = 5.0;
pub const HOUSE_HEIGHT: f32 = 3.5;
pub const DOOR_HEIGHT: f32 = 2.5;

/// What occupies one grid cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Walkable gap in the outer wall
    Entrance,
    Floor,
    Wall,
    Door { open: bool },
    /// Decoration building
    House,
    Tower,
    PlayerSpawn,
    /// Enemy spawn carrying an archetype tag
    EnemySpawn(String),
}

impl CellType {
    /// Parse a layout symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let cell = match symbol {
            '#' => Self::Wall,
            '.' => Self::Floor,
            'T' => Self::Tower,
            'H' => Self::House,
            'D' => Self::Door { open: false },
            'd' => Self::Door { open: true },
            'E' => Self::Entrance,
            'P' => Self::PlayerSpawn,
            'w' => Self::EnemySpawn("warrior".to_string()),
            'm' => Self::EnemySpawn("mage".to_string()),
            'r' => Self::EnemySpawn("rogue".to_string()),
            'n' => Self::EnemySpawn("minion".to_string()),
            _ => return None,
        };
        Some(cell)
    }

    /// Parse a numeric layout code
    pub fn from_code(code: u8) -> Option<Self> {
        let cell = match code {
            0 => Self::Entrance,
            1 => Self::Floor,
            2 => Self::Wall,
            3 => Self::House,
            4 => Self::Tower,
            _ => return None,
        };
        Some(cell)
    }

    /// Height of the solid box this cell becomes, None when walkable
    pub fn solid_height(&self) -> Option<f32> {
        match self {
            Self::Wall => Some(WALL_HEIGHT),
            Self::Tower => Some(TOWER_HEIGHT),
            Self::House => Some(HOUSE_HEIGHT),
            Self::Door { open: false } => Some(DOOR_HEIGHT),
            _ => None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.solid_height().is_none()
    }
}
