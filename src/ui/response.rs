use std::fmt;

use super::orchestrator::Outcome;
use crate::api::AnalysisResult;

/// Phrases that mark feedback as praise
const PRAISE_PHRASES: [&str; 4] = ["excellent", "closely matches", "great form", "good job"];

/// How the feedback panel is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Celebratory,
    Neutral,
}

impl FeedbackTone {
    /// Case-insensitive keyword match on the feedback text
    pub fn classify(feedback: &str) -> Self {
        let lower = feedback.to_lowercase();
        if PRAISE_PHRASES.iter().any(|p| lower.contains(p)) {
            FeedbackTone::Celebratory
        } else {
            FeedbackTone::Neutral
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            FeedbackTone::Celebratory => "Perfect Form!",
            FeedbackTone::Neutral => "Coach Feedback",
        }
    }
}

/// What the response panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseView<'a> {
    /// Nothing submitted yet
    Hidden,
    /// Request failed before a result came back
    NetworkError(&'a str),
    /// Service answered but could not analyze the videos
    AnalysisError(&'a str),
    Feedback {
        tone: FeedbackTone,
        feedback: &'a str,
        reference_frames: u32,
        user_frames: u32,
    },
}

impl<'a> ResponseView<'a> {
    /// A top-level error wins over any result
    pub fn new(result: Option<&'a AnalysisResult>, error: Option<&'a str>) -> Self {
        if let Some(error) = error {
            return ResponseView::NetworkError(error);
        }

        match result {
            None => ResponseView::Hidden,
            Some(AnalysisResult {
                error: Some(error), ..
            }) => ResponseView::AnalysisError(error.as_str()),
            Some(result) => ResponseView::Feedback {
                tone: FeedbackTone::classify(&result.feedback),
                feedback: &result.feedback,
                reference_frames: result.reference_frames,
                user_frames: result.user_frames,
            },
        }
    }

    pub fn from_outcome(outcome: Option<&'a Outcome>) -> Self {
        match outcome {
            None => Self::new(None, None),
            Some(Outcome::Success(result)) => Self::new(Some(result), None),
            Some(Outcome::Failed(error)) => Self::new(None, Some(error.as_str())),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseView::NetworkError(_) | ResponseView::AnalysisError(_))
    }
}

impl fmt::Display for ResponseView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseView::Hidden => Ok(()),
            ResponseView::NetworkError(error) => write!(f, "Error\n{}", error),
            ResponseView::AnalysisError(error) => write!(f, "Analysis Error\n{}", error),
            ResponseView::Feedback {
                tone,
                feedback,
                reference_frames,
                user_frames,
            } => {
                writeln!(
                    f,
                    "Analyzed {} reference frames and {} user frames",
                    reference_frames, user_frames
                )?;
                writeln!(f)?;
                writeln!(f, "{}", tone.heading())?;
                write!(f, "{}", feedback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(feedback: &str) -> AnalysisResult {
        AnalysisResult {
            feedback: feedback.to_string(),
            reference_frames: 120,
            user_frames: 118,
            error: None,
        }
    }

    #[test]
    fn test_praise_is_celebratory() {
        assert_eq!(
            FeedbackTone::classify("Great job, excellent extension!"),
            FeedbackTone::Celebratory
        );
        assert_eq!(
            FeedbackTone::classify("Your movement CLOSELY MATCHES the reference."),
            FeedbackTone::Celebratory
        );
        assert_eq!(FeedbackTone::classify("Good job!"), FeedbackTone::Celebratory);
    }

    #[test]
    fn test_correction_is_neutral() {
        assert_eq!(FeedbackTone::classify("Bend your knees more."), FeedbackTone::Neutral);
        assert_eq!(FeedbackTone::classify(""), FeedbackTone::Neutral);
    }

    #[test]
    fn test_top_level_error_wins() {
        let r = result("Great form");
        let view = ResponseView::new(Some(&r), Some("Analysis failed: 502 Bad Gateway"));

        assert_eq!(view, ResponseView::NetworkError("Analysis failed: 502 Bad Gateway"));
    }

    #[test]
    fn test_embedded_error_view() {
        let r = AnalysisResult {
            error: Some("Pose could not be detected in one or both videos.".to_string()),
            ..Default::default()
        };
        let view = ResponseView::new(Some(&r), None);

        assert!(view.is_error());
        assert_eq!(
            view.to_string(),
            "Analysis Error\nPose could not be detected in one or both videos."
        );
    }

    #[test]
    fn test_feedback_rendering() {
        let r = result("Bend your knees more.");
        let view = ResponseView::new(Some(&r), None);

        assert_eq!(
            view.to_string(),
            "Analyzed 120 reference frames and 118 user frames\n\nCoach Feedback\nBend your knees more."
        );
    }

    #[test]
    fn test_nothing_to_show() {
        assert_eq!(ResponseView::new(None, None), ResponseView::Hidden);
        assert_eq!(ResponseView::Hidden.to_string(), "");
    }
}
