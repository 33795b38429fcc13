use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ===== Risk State =====
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskState {
    Open,
    Closed,
    Accepted,
    Investigating,
}

impl RiskState {
    pub const ALL: [RiskState; 4] = [
        RiskState::Open,
        RiskState::Closed,
        RiskState::Accepted,
        RiskState::Investigating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskState::Open => "open",
            RiskState::Closed => "closed",
            RiskState::Accepted => "accepted",
            RiskState::Investigating => "investigating",
        }
    }
}

impl fmt::Display for RiskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskState {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| RegistryError::field_validation("state", "oneof"))
    }
}

// ===== Risk Model =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Risk {
    pub id: Uuid,
    pub state: RiskState,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Risk {
    /// Builds a new risk under a freshly generated v4 identifier.
    pub fn new(state: RiskState, title: String, description: String) -> Self {
        Risk {
            id: Uuid::new_v4(),
            state,
            title,
            description,
        }
    }
}

// ===== Create Risk Request =====
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct CreateRisk {
    #[validate(required, custom = "validate_state")]
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    // An empty state counts as missing.
    if state.is_empty() {
        return Err(ValidationError::new("required"));
    }

    if RiskState::ALL.iter().any(|s| s.as_str() == state) {
        Ok(())
    } else {
        Err(ValidationError::new("oneof"))
    }
}

impl TryFrom<CreateRisk> for Risk {
    type Error = RegistryError;

    fn try_from(req: CreateRisk) -> Result<Self, Self::Error> {
        req.validate()?;

        let state = req
            .state
            .as_deref()
            .ok_or_else(|| RegistryError::field_validation("state", "required"))?
            .parse::<RiskState>()?;

        Ok(Risk::new(
            state,
            req.title.unwrap_or_default(),
            req.description.unwrap_or_default(),
        ))
    }
}

// ===== Health Check =====
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub risks_stored: usize,
}

// ===== Error Response =====
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
