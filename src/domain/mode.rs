use serde::{Deserialize, Serialize};

/// Partition tag isolating real-money data from simulated data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Real,
    Simulation,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Real => "real",
            Mode::Simulation => "simulation",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Mode {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "real" => Ok(Mode::Real),
            "simulation" => Ok(Mode::Simulation),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(Mode::try_from("REAL").unwrap(), Mode::Real);
        assert_eq!(Mode::try_from("simulation").unwrap(), Mode::Simulation);
        assert!(Mode::try_from("paper").is_err());
        assert_eq!(Mode::default(), Mode::Real);
    }
}
