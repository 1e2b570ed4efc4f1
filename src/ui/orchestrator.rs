use tracing::{debug, error, info};

use super::response::ResponseView;
use crate::api::{AnalysisClient, AnalysisResult};
use crate::artifact::VideoArtifact;
use crate::capture::CaptureSession;

/// Which of the two videos an action applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Reference,
    User,
}

/// Result of the last submission: a result or an error, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(AnalysisResult),
    Failed(String),
}

/// Which screen the flow is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Picking or recording the two videos
    Selecting,
    /// Both videos submitted and an outcome is available
    Results,
}

/// Drives select reference → select user video → submit → show → reset
pub struct FormCheck<C> {
    client: C,
    reference: Option<VideoArtifact>,
    user: Option<VideoArtifact>,
    analyzing: bool,
    outcome: Option<Outcome>,
}

impl<C: AnalysisClient> FormCheck<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            reference: None,
            user: None,
            analyzing: false,
            outcome: None,
        }
    }

    /// Put `artifact` in `slot`, replacing any previous video
    ///
    /// Any previous result or error is discarded.
    pub fn select(&mut self, slot: Slot, artifact: VideoArtifact) {
        info!(
            "{:?} video selected ({} bytes)",
            slot,
            artifact.size()
        );
        *self.slot_mut(slot) = Some(artifact);
        self.outcome = None;
    }

    pub fn select_reference(&mut self, artifact: VideoArtifact) {
        self.select(Slot::Reference, artifact);
    }

    pub fn select_user(&mut self, artifact: VideoArtifact) {
        self.select(Slot::User, artifact);
    }

    /// Empty `slot`
    pub fn clear(&mut self, slot: Slot) {
        debug!("{:?} video cleared", slot);
        *self.slot_mut(slot) = None;
    }

    /// Move a finished recording from `session` into `slot`
    ///
    /// Returns false when the session has nothing to deliver.
    pub fn accept_recording(&mut self, slot: Slot, session: &mut CaptureSession) -> bool {
        match session.take_recording() {
            Some(artifact) => {
                self.select(slot, artifact);
                true
            }
            None => false,
        }
    }

    /// Send both videos for analysis
    ///
    /// Does nothing unless both videos are selected.
    pub async fn submit(&mut self) -> Option<&Outcome> {
        let (reference, user) = match (&self.reference, &self.user) {
            (Some(reference), Some(user)) => (reference, user),
            _ => {
                debug!("Submit ignored: both videos are required");
                return None;
            }
        };

        self.analyzing = true;
        self.outcome = None;

        let outcome = match self.client.analyze(reference, user).await {
            Ok(result) => {
                if let Some(e) = &result.error {
                    info!("Analysis returned an error: {}", e);
                }
                Outcome::Success(result)
            }
            Err(e) => {
                error!("Failed to analyze videos: {}", e);
                Outcome::Failed(e.to_string())
            }
        };

        self.analyzing = false;
        self.outcome = Some(outcome);
        self.outcome.as_ref()
    }

    /// Back to the initial state
    pub fn reset(&mut self) {
        info!("Starting over");
        self.reference = None;
        self.user = None;
        self.analyzing = false;
        self.outcome = None;
    }

    pub fn reference(&self) -> Option<&VideoArtifact> {
        self.reference.as_ref()
    }

    pub fn user(&self) -> Option<&VideoArtifact> {
        self.user.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn can_submit(&self) -> bool {
        self.reference.is_some() && self.user.is_some() && !self.analyzing
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Some(Outcome::Success(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Failed(error)) => Some(error.as_str()),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.reference.is_some() && self.user.is_some() && self.outcome.is_some() {
            Phase::Results
        } else {
            Phase::Selecting
        }
    }

    pub fn response_view(&self) -> ResponseView<'_> {
        ResponseView::from_outcome(self.outcome.as_ref())
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<VideoArtifact> {
        match slot {
            Slot::Reference => &mut self.reference,
            Slot::User => &mut self.user,
        }
    }
}
