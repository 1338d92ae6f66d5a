use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use once_cell::sync::OnceCell;
use singleton_macro::service;

use super::email_templates::EmailTemplate;
use crate::{config::MailConfig, errors::AppError};

/// SMTP 메일 발송
///
/// `MAIL_ENABLED`가 꺼져 있으면 실제 발송 대신 제목과 수신자를 로그로 남깁니다.
/// 전송 객체는 첫 발송 시 한 번 만들어 재사용합니다.
#[service(name = "email")]
pub struct EmailService {
    transport: OnceCell<AsyncSmtpTransport<Tokio1Executor>>,
}

fn mail_error(error: impl std::fmt::Display) -> AppError {
    AppError::ExternalServiceError(format!("Envoi d'email impossible : {}", error))
}

impl EmailService {
    fn transport(&self) -> Result<&AsyncSmtpTransport<Tokio1Executor>, AppError> {
        self.transport.get_or_try_init(|| {
            let host = MailConfig::smtp_host();
            let port = MailConfig::smtp_port();

            let builder = if !MailConfig::smtp_tls() {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host)
            } else if port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&host).map_err(mail_error)?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host).map_err(mail_error)?
            };

            let builder = builder.port(port);
            let builder = match (MailConfig::smtp_username(), MailConfig::smtp_password()) {
                (Some(username), Some(password)) => builder.credentials(Credentials::new(username, password)),
                _ => builder,
            };

            log::info!("SMTP 전송 초기화 - {}:{}", host, port);
            Ok(builder.build())
        })
    }

    pub async fn send(&self, to: &str, template: &EmailTemplate<'_>) -> Result<(), AppError> {
        let subject = template.subject();

        if !MailConfig::enabled() {
            log::info!("메일 발송 비활성화 - to: {}, subject: {}", to, subject);
            log::debug!("메일 본문:\n{}", template.body());
            return Ok(());
        }

        let from: Mailbox = MailConfig::from_address().parse().map_err(mail_error)?;
        let recipient: Mailbox = to.parse().map_err(mail_error)?;

        let message = Message::builder()
            .from(from)
            .to(recipient)
            .subject(subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(template.body())
            .map_err(mail_error)?;

        self.transport()?.send(message).await.map_err(mail_error)?;

        log::info!("메일 발송 완료 - to: {}, subject: {}", to, subject);
        Ok(())
    }

    /// 실패해도 요청을 실패시키지 않는 발송 (결과만 로그)
    pub async fn send_logged(&self, to: &str, template: &EmailTemplate<'_>) -> bool {
        match self.send(to, template).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("메일 발송 실패 - to: {}, 에러: {}", to, e);
                false
            }
        }
    }
}
