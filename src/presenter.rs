//! The presentation port: everything the controller needs from a UI.

use crate::download::DownloadLink;
use crate::types::Style;

/// Side effects the submitter and poller apply to whatever is showing the form.
///
/// Implementations must be cheap and non-blocking. The poller calls them while
/// holding its own lock so that a cancelled poll can never update the UI.
pub trait Presenter: Send + Sync {
    /// Put the preview area into its loading state.
    fn show_loading(&self);

    /// Hide the download action left over from a previous job.
    fn hide_download(&self);

    /// Replace the preview area with a single error message.
    fn show_error(&self, message: &str);

    /// Show the finished preview and reveal a download action bound to `link`.
    fn show_result(&self, link: &DownloadLink);

    /// Turn the highlight on the preview element for `style` on or off.
    ///
    /// Presenters without such an element keep the default no-op.
    fn set_style_highlight(&self, _style: Style, _active: bool) {}

    /// Set a theme variable such as `--color-temp`.
    fn set_theme_variable(&self, _name: &str, _value: &str) {}
}

/// Presenter for terminals: renders state changes as log lines and stdout.
#[derive(Debug, Default, Clone)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn show_loading(&self) {
        println!("Generating wallpaper...");
    }

    fn hide_download(&self) {}

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn show_result(&self, link: &DownloadLink) {
        println!("Preview ready: {}", link.url());
    }

    fn set_style_highlight(&self, style: Style, active: bool) {
        tracing::debug!(style = %style, active, "Style highlight");
    }

    fn set_theme_variable(&self, name: &str, value: &str) {
        tracing::debug!(name, value, "Theme variable updated");
    }
}
