//src/feedback.rs

/// Severity tag for notification side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
    Info,
}

/// Fire-and-forget notification sink (toast, sound, or haptic on a mobile
/// front end). Implementations must never block or fail the calling
/// operation; anything that goes wrong here is swallowed by the implementor.
pub trait Feedback {
    fn notify(&self, kind: FeedbackKind, message: &str);
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn notify(&self, _kind: FeedbackKind, _message: &str) {}
}
