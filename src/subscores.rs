use machine_learning::arch::INPUT_SIZE;
use serde::{Deserialize, Serialize};

use crate::{EngineErr, Result};

/// Upper bound of every raw sub-score.
pub const MAX_SUBSCORE: f32 = 100.0;

/// The four upstream match sub-scores of an application, each within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub skills: f32,
    pub experience: f32,
    pub location: f32,
    pub salary: f32,
}

impl SubScores {
    pub fn new(skills: f32, experience: f32, location: f32, salary: f32) -> Self {
        Self {
            skills,
            experience,
            location,
            salary,
        }
    }

    /// Checks every sub-score is a number within `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.named() {
            if !(0.0..=MAX_SUBSCORE).contains(&value) {
                return Err(EngineErr::InvalidSubScore { name, value });
            }
        }

        Ok(())
    }

    /// Validates and scales the sub-scores down to the network's `[0, 1]` input.
    pub fn normalized(&self) -> Result<[f32; INPUT_SIZE]> {
        self.validate()?;
        Ok(self.named().map(|(_, value)| value / MAX_SUBSCORE))
    }

    fn named(&self) -> [(&'static str, f32); INPUT_SIZE] {
        [
            ("skills", self.skills),
            ("experience", self.experience),
            ("location", self.location),
            ("salary", self.salary),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_in_input_order() {
        let input = SubScores::new(95., 80., 70., 50.).normalized().unwrap();
        assert_eq!(input, [0.95, 0.8, 0.7, 0.5]);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(SubScores::new(0., 100., 0., 100.).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        let err = SubScores::new(50., 101., 50., 50.).validate().unwrap_err();
        assert!(matches!(
            err,
            EngineErr::InvalidSubScore { name: "experience", .. }
        ));

        assert!(SubScores::new(-1., 0., 0., 0.).validate().is_err());
        assert!(SubScores::new(0., 0., f32::NAN, 0.).validate().is_err());
    }

    #[test]
    fn missing_field_fails_to_deserialize() {
        let res: serde_json::Result<SubScores> =
            serde_json::from_str(r#"{"skills": 10, "experience": 20, "location": 30}"#);
        assert!(res.is_err());
    }
}
