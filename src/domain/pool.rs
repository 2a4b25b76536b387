// Resort and pool domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resort {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub name: String,
    pub pool_type: String,
    pub resort_id: Option<String>,
}

/// Standard pools run a filtration loop with influent/effluent gauges;
/// bungalow plunge pools do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Standard,
    Bungalow,
}

impl Pool {
    /// Backend rows carry the kind as free text; anything unrecognized
    /// is treated as a standard pool.
    pub fn kind(&self) -> PoolKind {
        match self.pool_type.as_str() {
            "bungalow" => PoolKind::Bungalow,
            _ => PoolKind::Standard,
        }
    }

    pub fn has_flow_loop(&self) -> bool {
        self.kind() == PoolKind::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(pool_type: &str) -> Pool {
        Pool {
            id: "p1".to_string(),
            name: "Beach Pool".to_string(),
            pool_type: pool_type.to_string(),
            resort_id: Some("r1".to_string()),
        }
    }

    #[test]
    fn test_pool_kind_parsing() {
        assert_eq!(pool("standard").kind(), PoolKind::Standard);
        assert_eq!(pool("bungalow").kind(), PoolKind::Bungalow);
        assert_eq!(pool("spa").kind(), PoolKind::Standard);
    }

    #[test]
    fn test_only_standard_pools_have_a_flow_loop() {
        assert!(pool("standard").has_flow_loop());
        assert!(!pool("bungalow").has_flow_loop());
    }
}
