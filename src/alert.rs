//! Alert messages shown to the user after an htmx request.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element defined in [crate::html::base].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A success or error message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with some extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with an explanation of what went wrong or how to fix it.
    Error { message: String, details: String },
}

const SUCCESS_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm text-green-800 \
    rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 shadow";
const ERROR_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm text-red-800 \
    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 shadow";

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_STYLE, message, Some(details)),
        };

        html! {
            div class=(style) role="alert"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-auto bg-transparent border-none cursor-pointer"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        let status = match self {
            Alert::Success { .. } | Alert::SuccessSimple { .. } => StatusCode::OK,
            Alert::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn success_alert_renders_message_and_details() {
        let html = Alert::Success {
            message: "Student created".to_owned(),
            details: "Jane Doe was added.".to_owned(),
        }
        .into_html();

        let fragment = Html::parse_fragment(&html.into_string());
        let alert = fragment
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("Could not find alert element");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Student created"));
        assert!(text.contains("Jane Doe was added."));
    }

    #[test]
    fn simple_alert_omits_details_paragraph() {
        let html = Alert::SuccessSimple {
            message: "Deleted".to_owned(),
        }
        .into_html();

        let fragment = Html::parse_fragment(&html.into_string());
        let paragraphs = fragment.select(&Selector::parse("p").unwrap()).count();

        assert_eq!(paragraphs, 1);
    }

    #[test]
    fn error_alert_responds_with_server_error_status() {
        let response = Alert::Error {
            message: "Oops".to_owned(),
            details: String::new(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
