//! API request structures

use serde::{Deserialize, Serialize};

/// Upper bound on a configured span, in seconds
const MAX_TOTAL_SECONDS: u64 = 24 * 3600;

/// Request body for the set and reset endpoints. Omitted components
/// default to zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl DurationRequest {
    /// Validate clock-face component ranges and the total span bounds
    pub fn validate(&self) -> Result<(), String> {
        if self.hours > 24 {
            return Err("hours must be between 0 and 24".to_string());
        }
        if self.minutes > 59 {
            return Err("minutes must be between 0 and 59".to_string());
        }
        if self.seconds > 59 {
            return Err("seconds must be between 0 and 59".to_string());
        }

        let total = self.hours * 3600 + self.minutes * 60 + self.seconds;
        if total == 0 {
            return Err("duration must be at least one second".to_string());
        }
        if total > MAX_TOTAL_SECONDS {
            return Err("duration must not exceed 24 hours".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hours: u64, minutes: u64, seconds: u64) -> DurationRequest {
        DurationRequest {
            hours,
            minutes,
            seconds,
        }
    }

    #[test]
    fn accepts_in_range_durations() {
        assert!(request(0, 5, 0).validate().is_ok());
        assert!(request(0, 0, 1).validate().is_ok());
        assert!(request(24, 0, 0).validate().is_ok());
        assert!(request(1, 59, 59).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(request(25, 0, 0).validate().is_err());
        assert!(request(0, 60, 0).validate().is_err());
        assert!(request(0, 0, 60).validate().is_err());
    }

    #[test]
    fn rejects_zero_and_oversized_totals() {
        assert!(request(0, 0, 0).validate().is_err());
        assert!(request(24, 0, 1).validate().is_err());
    }

    #[test]
    fn omitted_components_default_to_zero() {
        let request: DurationRequest = serde_json::from_str(r#"{"minutes": 5}"#).unwrap();
        assert_eq!(request.hours, 0);
        assert_eq!(request.minutes, 5);
        assert_eq!(request.seconds, 0);
        assert!(request.validate().is_ok());
    }
}
