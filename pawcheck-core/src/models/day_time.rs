use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time-of-day slot for feeding and medication entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayTime {
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
}

impl DayTime {
    /// All slots in chronological order.
    pub const ALL: [DayTime; 5] = [
        DayTime::Morning,
        DayTime::Noon,
        DayTime::Afternoon,
        DayTime::Evening,
        DayTime::Night,
    ];
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayTime::Morning => write!(f, "morning"),
            DayTime::Noon => write!(f, "noon"),
            DayTime::Afternoon => write!(f, "afternoon"),
            DayTime::Evening => write!(f, "evening"),
            DayTime::Night => write!(f, "night"),
        }
    }
}

impl FromStr for DayTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(DayTime::Morning),
            "noon" => Ok(DayTime::Noon),
            "afternoon" => Ok(DayTime::Afternoon),
            "evening" => Ok(DayTime::Evening),
            "night" => Ok(DayTime::Night),
            _ => Err(format!(
                "Invalid time of day '{}'. Valid options: morning, noon, afternoon, evening, night",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_time_display() {
        assert_eq!(format!("{}", DayTime::Morning), "morning");
        assert_eq!(format!("{}", DayTime::Noon), "noon");
        assert_eq!(format!("{}", DayTime::Afternoon), "afternoon");
        assert_eq!(format!("{}", DayTime::Evening), "evening");
        assert_eq!(format!("{}", DayTime::Night), "night");
    }

    #[test]
    fn test_day_time_from_str() {
        assert_eq!(DayTime::from_str("morning").unwrap(), DayTime::Morning);
        assert_eq!(DayTime::from_str("NOON").unwrap(), DayTime::Noon);
        assert_eq!(DayTime::from_str("Evening").unwrap(), DayTime::Evening);
    }

    #[test]
    fn test_day_time_from_str_invalid() {
        assert!(DayTime::from_str("midnight").is_err());
        assert!(DayTime::from_str("").is_err());
    }

    #[test]
    fn test_day_time_json_roundtrip() {
        let slot = DayTime::Afternoon;
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"afternoon\"");

        let parsed: DayTime = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, slot);
    }

    #[test]
    fn test_all_is_chronological() {
        let mut sorted = DayTime::ALL;
        sorted.sort();
        assert_eq!(sorted, DayTime::ALL);
    }
}
