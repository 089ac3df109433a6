// Port host object: identity, ownership, state and its counter entity

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Fields;
use crate::error::StatsError;
use crate::stats::PortStats;

pub type PortId = u8;

/// Port collection in natural (ascending id) order.
pub type PortMap = BTreeMap<PortId, Port>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Down,
    #[default]
    Idle,
    Streams,
    Active,
    #[serde(alias = "pause")]
    Paused,
}

impl PortState {
    pub fn name(self) -> &'static str {
        match self {
            PortState::Down => "DOWN",
            PortState::Idle => "IDLE",
            PortState::Streams => "STREAMS",
            PortState::Active => "ACTIVE",
            PortState::Paused => "PAUSE",
        }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PortState {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DOWN" => Ok(PortState::Down),
            "IDLE" => Ok(PortState::Idle),
            "STREAMS" => Ok(PortState::Streams),
            "ACTIVE" => Ok(PortState::Active),
            "PAUSE" | "PAUSED" => Ok(PortState::Paused),
            _ => Err(StatsError::UnknownPortState(s.to_string())),
        }
    }
}

/// Parses a console port list such as "0,1, 3". Empty input selects nothing.
pub fn parse_port_list(s: &str) -> Result<Vec<PortId>, StatsError> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<PortId>()
                .map_err(|_| StatsError::InvalidPortList(s.to_string()))
        })
        .collect()
}

/// A traffic port as seen by the stats layer. Only `stats` is mutated here;
/// the rest is maintained by whoever owns the port lifecycle.
#[derive(Debug)]
pub struct Port {
    pub id: PortId,
    pub owner: String,
    pub state: PortState,
    pub driver: String,
    pub speed_gbps: u32,
    /// Stream ids loaded on the port; only the count is reported.
    pub streams: Vec<u32>,
    pub stats: PortStats,
}

impl Port {
    pub fn new(id: PortId, driver: impl Into<String>, speed_gbps: u32) -> Self {
        Self {
            id,
            owner: String::new(),
            state: PortState::default(),
            driver: driver.into(),
            speed_gbps,
            streams: Vec::new(),
            stats: PortStats::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PortState::Active | PortState::Paused)
    }

    pub fn port_state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn generate_port_stats(&self) -> Fields {
        self.stats.generate_stats(self)
    }

    pub fn generate_port_status(&self) -> Fields {
        Fields::new()
            .with("port-type", self.driver.as_str())
            .with("maximum", format!("{} Gb/s", self.speed_gbps))
            .with("port-status", self.port_state_name())
    }
}
