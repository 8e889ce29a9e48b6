use std::sync::Arc;

use crate::error::Result;
use crate::poller::{PollSettings, PollState, PreviewPoller};
use crate::presenter::Presenter;
use crate::service::GenerationService;
use crate::submitter::RequestSubmitter;
use crate::theme::{self, SwatchStyle, COLOR_TEMP_VAR, STYLE_PULSE};
use crate::types::{ColorTemp, FormFields, JobId, Style};

/// Wires form events to the submitter, poller and presenter.
///
/// One controller drives one form: style changes pulse the matching preview,
/// the color temperature slider updates the theme, and submission kicks off
/// the job/poll lifecycle.
pub struct WallpaperController<S, P> {
    presenter: Arc<P>,
    submitter: RequestSubmitter<S, P>,
}

impl<S, P> WallpaperController<S, P>
where
    S: GenerationService + 'static,
    P: Presenter + 'static,
{
    /// Create a controller and push the initial color temperature to the theme.
    pub fn new(
        service: Arc<S>,
        presenter: Arc<P>,
        settings: PollSettings,
        initial_temp: ColorTemp,
    ) -> Self {
        let controller = Self {
            submitter: RequestSubmitter::new(service, Arc::clone(&presenter), settings),
            presenter,
        };
        controller.apply_color_temp(initial_temp);
        controller
    }

    pub fn submitter(&self) -> &RequestSubmitter<S, P> {
        &self.submitter
    }

    pub fn poller(&self) -> &PreviewPoller<S, P> {
        self.submitter.poller()
    }

    /// Style selector changed. Unknown values do nothing.
    ///
    /// The matching preview is highlighted for [`STYLE_PULSE`]. Must be
    /// called from within a tokio runtime.
    pub fn on_style_change(&self, value: &str) {
        let style = match value.parse::<Style>() {
            Ok(style) => style,
            Err(_) => {
                tracing::debug!(value, "No preview for style");
                return;
            }
        };

        self.presenter.set_style_highlight(style, true);
        let presenter = Arc::clone(&self.presenter);
        tokio::spawn(async move {
            tokio::time::sleep(STYLE_PULSE).await;
            presenter.set_style_highlight(style, false);
        });
    }

    /// Color temperature slider moved. Out-of-range or non-numeric input is ignored.
    pub fn on_color_temp_input(&self, value: &str) {
        match value.parse::<ColorTemp>() {
            Ok(temp) => self.apply_color_temp(temp),
            Err(e) => tracing::debug!(error = %e, "Ignoring color temperature input"),
        }
    }

    fn apply_color_temp(&self, temp: ColorTemp) {
        self.presenter
            .set_theme_variable(COLOR_TEMP_VAR, &theme::color_temp_value(&temp));
    }

    /// Swatch decoration for each color option value, in order.
    pub fn color_swatches<'a>(&self, options: &[&'a str]) -> Vec<(&'a str, Option<SwatchStyle>)> {
        options
            .iter()
            .map(|&value| (value, theme::swatch_style(value)))
            .collect()
    }

    /// Submit the form. Polling starts only if the job was accepted.
    pub async fn on_submit(&self, form: &FormFields) -> Result<JobId> {
        self.submitter.submit_form(form).await
    }

    /// Wait for the current poll to settle.
    pub async fn wait(&self) -> PollState {
        self.poller().wait().await
    }
}
