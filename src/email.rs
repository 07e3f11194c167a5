//! Outbound mail service used to deliver consumption reports.
//!
//! Transport selection happens at startup: when `SMTP_HOST` is set the
//! service talks to a real relay, otherwise messages are written as files
//! under `EMAIL_FILE_DIR` so development and tests never need a mail server.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use lettre::{
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info, warn};

/// Mail service shared through the application state.
#[derive(Clone)]
pub struct EmailService {
    transport: Arc<EmailTransport>,
    from_email: String,
    from_name: String,
}

enum EmailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

impl fmt::Debug for EmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transport = match *self.transport {
            EmailTransport::Smtp(_) => "smtp",
            EmailTransport::File(_) => "file",
        };
        f.debug_struct("EmailService")
            .field("transport", &transport)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl EmailService {
    /// Build the service from environment variables.
    pub fn from_env() -> Result<Self> {
        let from_email = std::env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "reportes@consumo.local".to_string());
        let from_name = std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Consumo".to_string());

        let transport = match std::env::var("SMTP_HOST") {
            Ok(host) => {
                let port = std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|raw| raw.parse::<u16>().ok())
                    .unwrap_or(587);

                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                    .context("create SMTP transport")?
                    .port(port);

                match (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD")) {
                    (Ok(username), Ok(password)) => {
                        builder = builder.credentials(Credentials::new(username, password));
                    }
                    _ => {
                        warn!("SMTP credentials not configured, connecting unauthenticated");
                    }
                }

                info!("Email transport: SMTP via {}:{}", host, port);
                EmailTransport::Smtp(builder.build())
            }
            Err(_) => {
                let dir =
                    std::env::var("EMAIL_FILE_DIR").unwrap_or_else(|_| "./emails".to_string());
                let emails_dir = Path::new(&dir);
                if !emails_dir.exists() {
                    std::fs::create_dir_all(emails_dir).context("create emails directory")?;
                }

                info!("Email transport: writing messages to {}", dir);
                EmailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(emails_dir))
            }
        };

        Ok(Self {
            transport: Arc::new(transport),
            from_email,
            from_name,
        })
    }

    /// Build a service that writes messages into the given directory.
    ///
    /// The directory must already exist.
    pub fn with_file_transport(dir: impl AsRef<Path>) -> Self {
        Self {
            transport: Arc::new(EmailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(
                dir.as_ref(),
            ))),
            from_email: "reportes@consumo.local".to_string(),
            from_name: "Consumo".to_string(),
        }
    }

    /// Send a report as an attachment with a short plain-text body.
    pub async fn send_report(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
        filename: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<()> {
        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse::<Mailbox>()
            .context("parse sender mailbox")?;
        let to = to_email.parse::<Mailbox>().context("parse recipient mailbox")?;

        let attachment = Attachment::new(filename.to_string()).body(
            payload,
            ContentType::parse(content_type).context("parse attachment content type")?,
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(attachment),
            )
            .context("build email message")?;

        match &*self.transport {
            EmailTransport::Smtp(smtp) => {
                smtp.send(message).await.context("send SMTP email")?;
            }
            EmailTransport::File(file) => {
                file.send(message).await.context("write email file")?;
            }
        }

        debug!("Report {} mailed to {}", filename, to_email);
        Ok(())
    }
}
