use serde::Serialize;

/// How far a probability sits from the 0.5 indifference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Bands a confidence score in `[0, 1]`, the cut points are exclusive.
    pub fn from_score(score: f32) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongCandidate,
    GoodCandidate,
    ModerateFit,
    FocusElsewhere,
}

impl Recommendation {
    /// Bands a probability percentage, the cut points are inclusive.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            70.. => Self::StrongCandidate,
            50..=69 => Self::GoodCandidate,
            30..=49 => Self::ModerateFit,
            _ => Self::FocusElsewhere,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongCandidate => "strong candidate",
            Self::GoodCandidate => "good candidate",
            Self::ModerateFit => "moderate fit",
            Self::FocusElsewhere => "focus elsewhere",
        }
    }

    pub fn insight(&self) -> &'static str {
        match self {
            Self::StrongCandidate => {
                "Your profile closely matches what this employer is looking for, so this application has a high chance of being accepted."
            }
            Self::GoodCandidate => {
                "You meet most of the requirements for this role; highlighting your strongest skills should improve your chances."
            }
            Self::ModerateFit => {
                "You match some of the requirements, but gaps in skills or experience may weigh against this application."
            }
            Self::FocusElsewhere => {
                "This role is a weak match for your current profile; positions closer to your skills are more likely to succeed."
            }
        }
    }
}

/// The interpreted outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub probability_percent: u8,
    pub raw_probability: f32,
    pub confidence_level: ConfidenceLevel,
    pub confidence_score_percent: u8,
    pub recommendation: Recommendation,
    pub insight: String,
}

/// Converts a raw acceptance probability into a banded, human readable prediction.
pub fn interpret(raw_probability: f32) -> Prediction {
    let probability_percent = to_percent(raw_probability);
    let confidence_score = (raw_probability - 0.5).abs() * 2.;
    let recommendation = Recommendation::from_percent(probability_percent);

    Prediction {
        probability_percent,
        raw_probability,
        confidence_level: ConfidenceLevel::from_score(confidence_score),
        confidence_score_percent: to_percent(confidence_score),
        recommendation,
        insight: recommendation.insight().to_string(),
    }
}

fn to_percent(fraction: f32) -> u8 {
    (fraction * 100.).round().clamp(0., 100.) as u8
}
