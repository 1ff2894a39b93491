//! Notifications sent after a submission is stored.
//!
//! [`EmailNotifier`] delivers multipart mail over SMTP via lettre with Askama
//! templates. [`LogNotifier`] stands in when SMTP is not configured.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use awalan_core::{ContactId, Email, PhoneNumber};

use crate::config::EmailConfig;
use crate::models::NewContactSubmission;
use crate::services::unsubscribe::UnsubscribeSigner;

/// HTML template for the new-contact alert.
#[derive(Template)]
#[template(path = "email/admin_notification.html")]
struct AdminNotificationHtml<'a> {
    id: ContactId,
    name: &'a str,
    email: Option<&'a str>,
    phone: &'a str,
    whatsapp_link: &'a str,
    service: &'a str,
    message: &'a str,
    dashboard_url: &'a str,
}

/// Plain text template for the new-contact alert.
#[derive(Template)]
#[template(path = "email/admin_notification.txt")]
struct AdminNotificationText<'a> {
    id: ContactId,
    name: &'a str,
    email: Option<&'a str>,
    phone: &'a str,
    whatsapp_link: &'a str,
    service: &'a str,
    message: &'a str,
    dashboard_url: &'a str,
}

/// HTML template for the submitter's confirmation.
#[derive(Template)]
#[template(path = "email/contact_confirmation.html")]
struct ContactConfirmationHtml<'a> {
    name: &'a str,
    site_url: &'a str,
    whatsapp_link: &'a str,
}

/// Plain text template for the submitter's confirmation.
#[derive(Template)]
#[template(path = "email/contact_confirmation.txt")]
struct ContactConfirmationText<'a> {
    name: &'a str,
    site_url: &'a str,
    whatsapp_link: &'a str,
}

/// HTML template for the newsletter welcome.
#[derive(Template)]
#[template(path = "email/newsletter_welcome.html")]
struct NewsletterWelcomeHtml<'a> {
    site_url: &'a str,
    whatsapp_link: &'a str,
    unsubscribe_url: &'a str,
}

/// Plain text template for the newsletter welcome.
#[derive(Template)]
#[template(path = "email/newsletter_welcome.txt")]
struct NewsletterWelcomeText<'a> {
    site_url: &'a str,
    whatsapp_link: &'a str,
    unsubscribe_url: &'a str,
}

/// Errors that can occur when sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Outbound notifications triggered by the intake pipeline.
///
/// Failures are reported to the caller but never undo the stored record.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Alert the business about a new contact submission.
    async fn notify_admin(
        &self,
        id: ContactId,
        contact: &NewContactSubmission,
    ) -> Result<(), NotifyError>;

    /// Confirm receipt to a submitter who left an email address.
    async fn confirm_to_user(&self, email: &Email, name: &str) -> Result<(), NotifyError>;

    /// Welcome a new newsletter subscriber.
    async fn welcome_subscriber(&self, email: &Email) -> Result<(), NotifyError>;
}

/// SMTP notifier.
#[derive(Clone)]
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    admin_address: String,
    base_url: String,
    whatsapp_link: String,
    signer: UnsubscribeSigner,
}

impl EmailNotifier {
    /// Create a notifier from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be set up.
    pub fn new(
        config: &EmailConfig,
        base_url: &str,
        whatsapp_number: &str,
        signer: UnsubscribeSigner,
    ) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            admin_address: config.admin_address.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            whatsapp_link: format!("https://wa.me/{whatsapp_number}"),
            signer,
        })
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        reply_to: Option<&str>,
        subject: &str,
        text_body: String,
        html_body: String,
    ) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(to.to_string()))?)
            .subject(subject);

        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(reply_to.to_string()))?,
            );
        }

        let email = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body),
                ),
        )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify_admin(
        &self,
        id: ContactId,
        contact: &NewContactSubmission,
    ) -> Result<(), NotifyError> {
        let (html, text) = render_admin_notification(id, contact, &self.base_url)?;
        let subject = format!(
            "New contact from {} - {}",
            contact.name,
            contact.service.label()
        );

        self.send_multipart_email(
            &self.admin_address,
            contact.email.as_ref().map(Email::as_str),
            &subject,
            text,
            html,
        )
        .await
    }

    async fn confirm_to_user(&self, email: &Email, name: &str) -> Result<(), NotifyError> {
        let html = ContactConfirmationHtml {
            name,
            site_url: &self.base_url,
            whatsapp_link: &self.whatsapp_link,
        }
        .render()?;
        let text = ContactConfirmationText {
            name,
            site_url: &self.base_url,
            whatsapp_link: &self.whatsapp_link,
        }
        .render()?;

        self.send_multipart_email(
            email.as_str(),
            None,
            "Thanks for contacting Awalan Design",
            text,
            html,
        )
        .await
    }

    async fn welcome_subscriber(&self, email: &Email) -> Result<(), NotifyError> {
        let unsubscribe_url = self.signer.link(&self.base_url, email);
        let html = NewsletterWelcomeHtml {
            site_url: &self.base_url,
            whatsapp_link: &self.whatsapp_link,
            unsubscribe_url: &unsubscribe_url,
        }
        .render()?;
        let text = NewsletterWelcomeText {
            site_url: &self.base_url,
            whatsapp_link: &self.whatsapp_link,
            unsubscribe_url: &unsubscribe_url,
        }
        .render()?;

        self.send_multipart_email(
            email.as_str(),
            None,
            "Welcome to the Awalan Design newsletter",
            text,
            html,
        )
        .await
    }
}

/// Render the admin alert as `(html, text)`.
fn render_admin_notification(
    id: ContactId,
    contact: &NewContactSubmission,
    base_url: &str,
) -> Result<(String, String), askama::Error> {
    let whatsapp_link = PhoneNumber::whatsapp_link(&contact.phone);
    let dashboard_url = format!("{base_url}/admin");
    let email = contact.email.as_ref().map(Email::as_str);

    let html = AdminNotificationHtml {
        id,
        name: &contact.name,
        email,
        phone: contact.phone.as_str(),
        whatsapp_link: &whatsapp_link,
        service: contact.service.label(),
        message: &contact.message,
        dashboard_url: &dashboard_url,
    }
    .render()?;
    let text = AdminNotificationText {
        id,
        name: &contact.name,
        email,
        phone: contact.phone.as_str(),
        whatsapp_link: &whatsapp_link,
        service: contact.service.label(),
        message: &contact.message,
        dashboard_url: &dashboard_url,
    }
    .render()?;

    Ok((html, text))
}

/// Notifier used when SMTP is not configured: logs and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_admin(
        &self,
        id: ContactId,
        contact: &NewContactSubmission,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            contact_id = %id,
            service = %contact.service,
            "SMTP not configured; admin notification logged only"
        );
        Ok(())
    }

    async fn confirm_to_user(&self, email: &Email, _name: &str) -> Result<(), NotifyError> {
        tracing::info!(to = %email, "SMTP not configured; confirmation logged only");
        Ok(())
    }

    async fn welcome_subscriber(&self, email: &Email) -> Result<(), NotifyError> {
        tracing::info!(to = %email, "SMTP not configured; welcome email logged only");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use awalan_core::ServiceKind;

    use super::*;

    fn contact(name: &str, email: Option<&str>) -> NewContactSubmission {
        NewContactSubmission {
            name: name.to_string(),
            email: email.map(|e| Email::parse(e).unwrap()),
            phone: PhoneNumber::parse("081234567890").unwrap(),
            service: ServiceKind::SocialMedia,
            message: "Need <b>posts</b> for Lebaran".to_string(),
        }
    }

    #[test]
    fn test_admin_notification_contents() {
        let (html, text) = render_admin_notification(
            ContactId::new(7),
            &contact("Budi", Some("budi@example.com")),
            "https://awalandesign.id",
        )
        .unwrap();

        for body in [&html, &text] {
            assert!(body.contains("Budi"));
            assert!(body.contains("Social Media Kit"));
            assert!(body.contains("https://wa.me/6281234567890"));
            assert!(body.contains("budi@example.com"));
            assert!(body.contains("https://awalandesign.id/admin"));
        }
    }

    #[test]
    fn test_admin_notification_html_escapes_input() {
        let (html, text) = render_admin_notification(
            ContactId::new(1),
            &contact("<script>alert(1)</script>", None),
            "https://awalandesign.id",
        )
        .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&#60;script&#62;") || html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>posts</b>"));
        // Plain text is sent as-is
        assert!(text.contains("<b>posts</b>"));
    }

    #[test]
    fn test_admin_notification_without_email() {
        let (html, _) = render_admin_notification(
            ContactId::new(1),
            &contact("Budi", None),
            "https://awalandesign.id",
        )
        .unwrap();
        assert!(html.contains("not provided"));
    }

    #[test]
    fn test_welcome_contains_unsubscribe_link() {
        let html = NewsletterWelcomeHtml {
            site_url: "https://awalandesign.id",
            whatsapp_link: "https://wa.me/6285815056990",
            unsubscribe_url: "https://awalandesign.id/newsletter/unsubscribe?email=a%40b.co&tag=ab",
        }
        .render()
        .unwrap();
        assert!(html.contains("/newsletter/unsubscribe?email=a%40b.co"));
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier;
        let email = Email::parse("budi@example.com").unwrap();
        notifier
            .notify_admin(ContactId::new(1), &contact("Budi", None))
            .await
            .unwrap();
        notifier.confirm_to_user(&email, "Budi").await.unwrap();
        notifier.welcome_subscriber(&email).await.unwrap();
    }
}
