//! Terminal rendering for views, failures and notifications

use console::style;

use crate::controller::RequestState;
use crate::error::RequestError;
use crate::notification::Notification;
use crate::presentation::{DocumentView, PresentationModel, SocialView};

/// Blog card: title, sections in order, italic conclusion
pub fn render_document(view: &DocumentView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", style("✏️  Blog Content").cyan().bold()));
    out.push_str(&format!("{}\n\n", style(view.title()).bold().underlined()));
    for section in view.sections() {
        out.push_str(&format!("{}\n", style(&section.heading).bold()));
        out.push_str(&format!("{}\n\n", section.body));
    }
    out.push_str(&format!("{}\n", style(view.conclusion()).italic()));
    out
}

/// Social card. The post is printed verbatim, line breaks included.
pub fn render_social(view: &SocialView<'_>) -> String {
    format!(
        "{}\n\n{}\n",
        style("👥 LinkedIn Engaging Content").cyan().bold(),
        view.text()
    )
}

pub fn render_disclaimer(text: &str) -> String {
    format!(
        "{}\n{}\n",
        style("⚠️  Disclaimer").yellow().bold(),
        style(text).dim()
    )
}

pub fn render_failure(error: &RequestError) -> String {
    format!("{} {}\n", style("✗").red().bold(), style(error.user_message()).red())
}

pub fn render_notification(notification: &Notification) -> Option<String> {
    notification
        .visible
        .then(|| format!("{} {}", style("✓").green(), style(&notification.message).green()))
}

/// Everything that goes where the result renders, followed by the disclaimer.
pub fn render_outcome(
    state: &RequestState,
    presentation: Option<&PresentationModel>,
    disclaimer: &str,
) -> String {
    let mut out = String::new();
    if let Some(error) = state.error() {
        out.push_str(&render_failure(error));
        out.push('\n');
    } else if let Some(model) = presentation {
        out.push_str(&render_document(&model.document()));
        out.push('\n');
        out.push_str(&render_social(&model.social()));
        out.push('\n');
    }
    out.push_str(&render_disclaimer(disclaimer));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{canned_generation, DEMO_SOCIAL_POST};
    use crate::presentation::decode_result;
    use std::sync::Arc;

    fn model() -> PresentationModel {
        PresentationModel::new(Arc::new(decode_result(canned_generation().unwrap()).unwrap()))
    }

    #[test]
    fn social_card_keeps_post_verbatim() {
        console::set_colors_enabled(false);
        let rendered = render_social(&model().social());
        assert!(rendered.contains(DEMO_SOCIAL_POST));
    }

    #[test]
    fn failure_replaces_result() {
        console::set_colors_enabled(false);
        let error = RequestError::Validation {
            missing: vec![crate::model::Field::Credential],
        };
        let model = model();
        let rendered = render_outcome(&RequestState::Failed(error), Some(&model), "note");

        assert!(rendered.contains("Please fill in: api key."));
        assert!(!rendered.contains("Blog Content"));
        assert!(rendered.ends_with("note\n"));
    }

    #[test]
    fn hidden_notification_renders_nothing() {
        let hidden = Notification {
            message: "Copied to clipboard!".into(),
            visible: false,
        };
        assert_eq!(render_notification(&hidden), None);
    }
}
