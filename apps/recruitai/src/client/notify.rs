use std::time::Duration;

use tokio::time::Instant;

pub const TOAST_DURATION: Duration = Duration::from_secs(6);

/// The error toast. Each `show` restarts the six-second auto-hide window.
#[derive(Debug, Clone, Default)]
pub struct Toast {
    message: Option<String>,
    hide_at: Option<Instant>,
}

impl Toast {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.hide_at = Some(Instant::now() + TOAST_DURATION);
    }

    /// Close button.
    pub fn dismiss(&mut self) {
        self.message = None;
        self.hide_at = None;
    }

    /// The message currently on screen, if the toast has not auto-hidden yet.
    pub fn visible_message(&self) -> Option<&str> {
        match self.hide_at {
            Some(deadline) if Instant::now() < deadline => self.message.as_deref(),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible_message().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_hides_after_six_seconds() {
        let mut toast = Toast::default();
        toast.show("Please upload a Job Description file.");
        assert_eq!(
            toast.visible_message(),
            Some("Please upload a Job Description file.")
        );

        tokio::time::advance(Duration::from_millis(5_999)).await;
        assert!(toast.is_visible());
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!toast.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_show_restarts_window() {
        let mut toast = Toast::default();
        toast.show("first");
        tokio::time::advance(Duration::from_secs(4)).await;
        toast.show("second");
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(toast.visible_message(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_hides_immediately() {
        let mut toast = Toast::default();
        toast.show("oops");
        toast.dismiss();
        assert!(!toast.is_visible());
    }
}
