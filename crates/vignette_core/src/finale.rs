//! The closing question
//!
//! Declining does not end the experience: the decline control turns into a
//! second accept control, so every path ends in [`FinalePhase::Accepted`].

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalePhase {
    Asking,
    /// Declined once; the decline control now accepts
    Declined,
    Accepted,
}

/// Text shown on the finale screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinaleCopy {
    pub question: String,
    pub accepted: String,
    pub accept_label: String,
    pub decline_label: String,
    /// Label of the decline control after it has been used once
    pub relabelled_decline: String,
}

/// What the shell should show for the finale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinaleView<'a> {
    pub text: &'a str,
    /// `None` once accepted
    pub accept_label: Option<&'a str>,
    /// `None` once accepted
    pub decline_label: Option<&'a str>,
}

impl FinalePhase {
    /// Accept from any phase
    pub fn accept(self) -> FinalePhase {
        FinalePhase::Accepted
    }

    /// Use the decline control
    pub fn decline(self) -> FinalePhase {
        match self {
            FinalePhase::Asking => FinalePhase::Declined,
            FinalePhase::Declined | FinalePhase::Accepted => FinalePhase::Accepted,
        }
    }

    pub fn is_accepted(self) -> bool {
        self == FinalePhase::Accepted
    }

    pub fn view(self, copy: &FinaleCopy) -> FinaleView<'_> {
        match self {
            FinalePhase::Asking => FinaleView {
                text: &copy.question,
                accept_label: Some(&copy.accept_label),
                decline_label: Some(&copy.decline_label),
            },
            FinalePhase::Declined => FinaleView {
                text: &copy.question,
                accept_label: Some(&copy.accept_label),
                decline_label: Some(&copy.relabelled_decline),
            },
            FinalePhase::Accepted => FinaleView {
                text: &copy.accepted,
                accept_label: None,
                decline_label: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy() -> FinaleCopy {
        FinaleCopy {
            question: "will you?".into(),
            accepted: "yay".into(),
            accept_label: "yes".into(),
            decline_label: "no".into(),
            relabelled_decline: "okay fine, yes".into(),
        }
    }

    #[test]
    fn test_accept_from_asking() {
        assert_eq!(FinalePhase::Asking.accept(), FinalePhase::Accepted);
    }

    #[test]
    fn test_decline_then_decline_control_accepts() {
        // Declining only relabels the control; using it again accepts.
        let declined = FinalePhase::Asking.decline();
        assert_eq!(declined, FinalePhase::Declined);
        assert_eq!(declined.decline(), FinalePhase::Accepted);
        assert_eq!(declined.decline(), FinalePhase::Asking.accept());
    }

    #[test]
    fn test_accepted_is_terminal() {
        assert_eq!(FinalePhase::Accepted.decline(), FinalePhase::Accepted);
        assert_eq!(FinalePhase::Accepted.accept(), FinalePhase::Accepted);
    }

    #[test]
    fn test_view_relabels_decline() {
        let copy = copy();
        assert_eq!(FinalePhase::Asking.view(&copy).decline_label, Some("no"));
        assert_eq!(
            FinalePhase::Declined.view(&copy).decline_label,
            Some("okay fine, yes")
        );
        let done = FinalePhase::Accepted.view(&copy);
        assert_eq!(done.text, "yay");
        assert!(done.accept_label.is_none());
        assert!(done.decline_label.is_none());
    }
}
