//! # Contact Form Command

use basket_core::validation::validate_contact_form;
use basket_core::{ContactForm, Severity};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::notify::Notifier;

/// Submits the contact form.
///
/// ## Behavior
/// - Every field filled in: "Thank you, {name}! Your message has been sent."
///   and the trimmed form is returned so the page can reset its inputs
/// - Any field blank: "Please fill out all fields before submitting."
///
/// Nothing is sent anywhere; the form only has to be complete.
pub fn submit_contact_form(
    notifier: &dyn Notifier,
    form: &ContactForm,
) -> Result<ContactForm, ApiError> {
    debug!("submit_contact_form command");

    match validate_contact_form(form) {
        Ok(form) => {
            info!(subject = %form.subject, "Contact message accepted");
            notifier.notify(
                &format!("Thank you, {}! Your message has been sent.", form.name),
                Severity::Success,
            );
            Ok(form)
        }
        Err(e) => {
            debug!(error = %e, "Contact form incomplete");
            notifier.notify(
                "Please fill out all fields before submitting.",
                Severity::Error,
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::notify::ToastCenter;

    fn form() -> ContactForm {
        ContactForm {
            name: " Ada ".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Order".to_string(),
            message: "Where is my tea?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_complete_form_thanks_sender() {
        let toasts = ToastCenter::default();

        let sent = submit_contact_form(&toasts, &form()).unwrap();
        assert_eq!(sent.name, "Ada");

        let visible = toasts.visible();
        assert_eq!(visible[0].message, "Thank you, Ada! Your message has been sent.");
        assert_eq!(visible[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_blank_field_is_rejected() {
        let toasts = ToastCenter::default();
        let mut incomplete = form();
        incomplete.subject = "   ".to_string();

        let err = submit_contact_form(&toasts, &incomplete).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "subject is required");
        assert_eq!(
            toasts.messages(),
            vec!["Please fill out all fields before submitting.".to_string()]
        );
    }
}
