//! Engine tunables (spec §6's configuration table) and the network mode
//! passed to the road-graph collaborator.

use serde::{Deserialize, Serialize};

/// The transport mode to request from the road-graph collaborator
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum NetworkType {
    Walk,
    Drive,
    Bike,
}

impl Default for NetworkType {
    fn default() -> Self {
        NetworkType::Walk
    }
}

impl std::str::FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" => Ok(NetworkType::Walk),
            "drive" => Ok(NetworkType::Drive),
            "bike" => Ok(NetworkType::Bike),
            other => Err(format!("unknown network type '{other}', expected walk/drive/bike")),
        }
    }
}

/// Tunables recognised by the engine, with the defaults of spec §6
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Weight of the goal-proximity term `C1` in the router's edge cost
    pub alpha: f64,
    /// Weight of the traversal-cost term `C2`
    pub beta: f64,
    /// Weight of the shape-deviation term `C3`
    pub gamma: f64,
    /// Passed to the road-graph collaborator
    pub network_type: NetworkType,
    /// Graph radius around the anchor, in metres
    pub network_distance: f64,
    /// Shrinks the target length to account for road detours
    pub path_length_adjustment: f64,
    /// Angular resolution of the orientation search
    pub rotation_search_steps: usize,
    /// Point count for the low-resolution (router) shape
    pub resample_points: usize,
    /// Point count for the high-resolution (orientation search) shape
    pub rotation_search_points: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            alpha: 1.0,
            beta: 5.0,
            gamma: 1.0,
            network_type: NetworkType::Walk,
            network_distance: 4000.,
            path_length_adjustment: 0.7,
            rotation_search_steps: 360,
            resample_points: 40,
            rotation_search_points: 200,
        }
    }
}
