//! 발송 메일 본문 (일반 텍스트, 프랑스어)

use crate::config::MailConfig;

/// 발송 가능한 메일 종류와 본문에 필요한 값
#[derive(Debug, Clone)]
pub enum EmailTemplate<'a> {
    Verification {
        first_name: &'a str,
        token: &'a str,
    },
    PasswordReset {
        first_name: &'a str,
        token: &'a str,
    },
    PasswordChanged {
        first_name: &'a str,
    },
    ProjectCreated {
        first_name: &'a str,
        project_name: &'a str,
        start: Option<String>,
        end: Option<String>,
    },
    ProjectDeadline {
        first_name: &'a str,
        project_name: &'a str,
        deadline: Option<String>,
    },
    Custom {
        first_name: &'a str,
        title: &'a str,
        message: &'a str,
    },
    DeliverableEvaluated {
        first_name: &'a str,
        deliverable_id: &'a str,
        deliverable_name: &'a str,
        note: Option<f64>,
        appreciation: &'a str,
        comments: Option<&'a str>,
    },
    DeliverableSubmitted {
        teacher_first_name: &'a str,
        deliverable_name: &'a str,
        project_name: &'a str,
        group_name: &'a str,
        submitted_at: String,
    },
}

const SIGNATURE: &str = "\n\nCordialement,\nL'équipe EduProject";

impl EmailTemplate<'_> {
    pub fn subject(&self) -> String {
        match self {
            EmailTemplate::Verification { .. } => "Vérification de votre email - EduProject".to_string(),
            EmailTemplate::PasswordReset { .. } => {
                "Réinitialisation de votre mot de passe - EduProject".to_string()
            }
            EmailTemplate::PasswordChanged { .. } => {
                "Confirmation de changement de mot de passe - EduProject".to_string()
            }
            EmailTemplate::ProjectCreated { project_name, .. } => {
                format!("Nouveau projet créé - {}", project_name)
            }
            EmailTemplate::ProjectDeadline { project_name, .. } => {
                format!("Rappel d'échéance de projet - {}", project_name)
            }
            EmailTemplate::Custom { title, .. } => title.to_string(),
            EmailTemplate::DeliverableEvaluated { deliverable_name, .. } => {
                format!("Votre livrable a été évalué - {}", deliverable_name)
            }
            EmailTemplate::DeliverableSubmitted { deliverable_name, .. } => {
                format!("Nouveau dépôt de livrable - {}", deliverable_name)
            }
        }
    }

    pub fn body(&self) -> String {
        let content = match self {
            EmailTemplate::Verification { first_name, token } => format!(
                "Bonjour {},\n\nMerci pour votre inscription. Confirmez votre adresse email en ouvrant le lien suivant :\n{}?token={}\n\nCe lien expire dans 24 heures.",
                first_name,
                MailConfig::verification_url(),
                token
            ),
            EmailTemplate::PasswordReset { first_name, token } => format!(
                "Bonjour {},\n\nUne réinitialisation de mot de passe a été demandée pour votre compte. Utilisez le lien suivant :\n{}/reset-password?token={}\n\nCe lien expire dans 60 minutes. Si vous n'êtes pas à l'origine de cette demande, ignorez ce message.",
                first_name,
                MailConfig::frontend_base_url(),
                token
            ),
            EmailTemplate::PasswordChanged { first_name } => format!(
                "Bonjour {},\n\nLe mot de passe de votre compte vient d'être modifié. Si vous n'êtes pas à l'origine de ce changement, contactez immédiatement un administrateur.",
                first_name
            ),
            EmailTemplate::ProjectCreated {
                first_name,
                project_name,
                start,
                end,
            } => format!(
                "Bonjour {},\n\nUn nouveau projet vous a été attribué : {}.\nDébut : {}\nFin : {}",
                first_name,
                project_name,
                start.as_deref().unwrap_or("non définie"),
                end.as_deref().unwrap_or("non définie")
            ),
            EmailTemplate::ProjectDeadline {
                first_name,
                project_name,
                deadline,
            } => format!(
                "Bonjour {},\n\nL'échéance du projet {} approche : {}.\nPensez à finaliser vos tâches et vos livrables.",
                first_name,
                project_name,
                deadline.as_deref().unwrap_or("date non définie")
            ),
            EmailTemplate::Custom {
                first_name,
                title,
                message,
            } => format!("Bonjour {},\n\n{}\n\n{}", first_name, title, message),
            EmailTemplate::DeliverableEvaluated {
                first_name,
                deliverable_id,
                deliverable_name,
                note,
                appreciation,
                comments,
            } => format!(
                "Bonjour {},\n\nVotre livrable {} a été évalué.\nNote : {}\nAppréciation : {}\nCommentaires : {}\n\nConsulter le livrable : {}/livrables/{}",
                first_name,
                deliverable_name,
                note.map(|n| format!("{}/20", n))
                    .unwrap_or_else(|| "non attribuée".to_string()),
                appreciation,
                comments.unwrap_or("aucun"),
                MailConfig::frontend_base_url(),
                deliverable_id
            ),
            EmailTemplate::DeliverableSubmitted {
                teacher_first_name,
                deliverable_name,
                project_name,
                group_name,
                submitted_at,
            } => format!(
                "Bonjour {},\n\nLe groupe {} a déposé le livrable {} pour le projet {} le {}.",
                teacher_first_name, group_name, deliverable_name, project_name, submitted_at
            ),
        };
        format!("{}{}", content, SIGNATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subjects() {
        let verification = EmailTemplate::Verification {
            first_name: "Awa",
            token: "t",
        };
        assert_eq!(verification.subject(), "Vérification de votre email - EduProject");

        let deadline = EmailTemplate::ProjectDeadline {
            first_name: "Awa",
            project_name: "Compilateur",
            deadline: None,
        };
        assert_eq!(deadline.subject(), "Rappel d'échéance de projet - Compilateur");

        let custom = EmailTemplate::Custom {
            first_name: "Awa",
            title: "Soutenance",
            message: "Lundi",
        };
        assert_eq!(custom.subject(), "Soutenance");
    }

    #[test]
    fn test_links_in_bodies() {
        let reset = EmailTemplate::PasswordReset {
            first_name: "Awa",
            token: "abc-123",
        };
        assert!(reset.body().contains("/reset-password?token=abc-123"));

        let verification = EmailTemplate::Verification {
            first_name: "Awa",
            token: "xyz",
        };
        assert!(verification.body().contains("?token=xyz"));

        let evaluated = EmailTemplate::DeliverableEvaluated {
            first_name: "Awa",
            deliverable_id: "d1",
            deliverable_name: "Rapport",
            note: Some(15.0),
            appreciation: "Bien",
            comments: None,
        };
        let body = evaluated.body();
        assert!(body.contains("/livrables/d1"));
        assert!(body.contains("15/20"));
        assert!(body.ends_with("L'équipe EduProject"));
    }
}
