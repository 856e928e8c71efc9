//! Trip request parameters and input validation.

use serde::{Deserialize, Serialize};

use super::WorkflowError;

/// Travel season. Closed enumeration; parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Winter,
    Monsoon,
    Spring,
    Autumn,
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Summer => "summer",
            Self::Winter => "winter",
            Self::Monsoon => "monsoon",
            Self::Spring => "spring",
            Self::Autumn => "autumn",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Season {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summer" => Ok(Self::Summer),
            "winter" => Ok(Self::Winter),
            "monsoon" => Ok(Self::Monsoon),
            "spring" => Ok(Self::Spring),
            "autumn" => Ok(Self::Autumn),
            other => Err(WorkflowError::InvalidInput(format!(
                "season must be one of summer, winter, monsoon, spring, autumn (got '{other}')"
            ))),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Parameters for one planning invocation.
///
/// The retry controller reassigns `budget` between attempts and the
/// sequencer fills in `destination_city` after stage 1; every other field
/// is fixed for the lifetime of the invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Free-text interests, e.g. "culture, food, history".
    pub interests: String,

    /// Total budget in `currency` units.
    pub budget: u64,

    /// Trip length in days.
    pub duration: u32,

    /// Departure city.
    pub start_city: String,

    /// Travel season.
    pub season: Season,

    /// Number of travelers.
    pub people: u32,

    /// Currency code, defaults to INR.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Chosen destination; set by the workflow after city selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
}

impl TripRequest {
    /// Validate all base fields. Must pass before any stage runs.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let interests = self.interests.trim();
        if interests.is_empty() {
            return Err(WorkflowError::InvalidInput(
                "interests cannot be empty".to_string(),
            ));
        }
        if interests.len() < 3 || interests.len() > 200 {
            return Err(WorkflowError::InvalidInput(
                "interests must be between 3 and 200 characters".to_string(),
            ));
        }

        if self.budget == 0 {
            return Err(WorkflowError::InvalidInput(
                "budget must be greater than 0".to_string(),
            ));
        }

        if self.duration == 0 || self.duration > 30 {
            return Err(WorkflowError::InvalidInput(
                "duration must be between 1 and 30 days".to_string(),
            ));
        }

        let start_city = self.start_city.trim();
        if start_city.len() < 2 || start_city.len() > 100 {
            return Err(WorkflowError::InvalidInput(
                "start_city must be between 2 and 100 characters".to_string(),
            ));
        }

        if self.people == 0 || self.people > 20 {
            return Err(WorkflowError::InvalidInput(
                "people must be between 1 and 20".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TripRequest {
        TripRequest {
            interests: "culture, food".to_string(),
            budget: 50_000,
            duration: 5,
            start_city: "Mumbai".to_string(),
            season: Season::Winter,
            people: 2,
            currency: "INR".to_string(),
            destination_city: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn zero_budget_is_rejected() {
        let mut request = valid();
        request.budget = 0;
        assert!(matches!(
            request.validate(),
            Err(WorkflowError::InvalidInput(_))
        ));
    }

    #[test]
    fn duration_out_of_range_is_rejected() {
        let mut request = valid();
        request.duration = 31;
        assert!(request.validate().is_err());
        request.duration = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn blank_interests_are_rejected() {
        let mut request = valid();
        request.interests = "  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn season_parses_case_insensitively() {
        assert_eq!("WINTER".parse::<Season>().unwrap(), Season::Winter);
        assert_eq!("Monsoon".parse::<Season>().unwrap(), Season::Monsoon);
        assert!("midwinter".parse::<Season>().is_err());
    }

    #[test]
    fn currency_defaults_to_inr() {
        let request: TripRequest = serde_json::from_str(
            r#"{"interests":"food","budget":10000,"duration":2,
                "start_city":"Pune","season":"summer","people":1}"#,
        )
        .unwrap();
        assert_eq!(request.currency, "INR");
    }
}
