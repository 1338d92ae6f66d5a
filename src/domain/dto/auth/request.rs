use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::utils::string_utils::deserialize_optional_string;

/// 회원가입 요청. 역할을 생략하면 `ENSEIGNANT`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom est obligatoire"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100, message = "Le prénom est obligatoire"))]
    pub first_name: String,

    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,

    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: String,

    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub faculty: Option<String>,

    #[serde(default)]
    pub departments: Vec<String>,

    /// 학생 전용
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub field_of_study: Option<String>,

    /// 교수 전용
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub specialty: Option<String>,
}

/// `ETUDIANT`, `ENSEIGNANT`, `ADMIN` (대소문자, `ROLE_` 접두사 무시)
pub(crate) fn validate_role(role: &str) -> Result<(), ValidationError> {
    if crate::domain::entities::users::Role::from_str(role).is_none() {
        return Err(ValidationError::new("invalid_role").with_message("Rôle inconnu".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,

    #[validate(length(min = 1, message = "Le mot de passe est obligatoire"))]
    pub password: String,
}

/// 쿠키로 보내지 않은 경우 본문으로 받는 리프레시 토큰
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Authorization 헤더 대신 본문으로 토큰을 검증할 때 사용
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyTokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenQuery {
    #[validate(length(min = 1, message = "Le jeton est obligatoire"))]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Le jeton est obligatoire"))]
    pub token: String,

    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_password_differs"))]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Le mot de passe actuel est obligatoire"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub new_password: String,
}

fn validate_password_differs(req: &ChangePasswordRequest) -> Result<(), ValidationError> {
    if req.current_password == req.new_password {
        return Err(ValidationError::new("same_password")
            .with_message("Le nouveau mot de passe doit être différent de l'ancien".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(body: serde_json::Value) -> RegisterRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_register_validation() {
        let valid = register(json!({
            "last_name": "Diallo",
            "first_name": "Awa",
            "email": "awa@univ.fr",
            "password": "motdepasse",
            "phone": "  ",
        }));
        assert!(valid.validate().is_ok());
        assert!(valid.phone.is_none());
        assert!(valid.role.is_none());

        let short_password = register(json!({
            "last_name": "Diallo",
            "first_name": "Awa",
            "email": "awa@univ.fr",
            "password": "court",
        }));
        assert!(short_password.validate().is_err());

        let bad_role = register(json!({
            "last_name": "Diallo",
            "first_name": "Awa",
            "email": "awa@univ.fr",
            "password": "motdepasse",
            "role": "DIRECTEUR",
        }));
        assert!(bad_role.validate().is_err());
    }

    #[test]
    fn test_login_requires_email() {
        let request = LoginRequest {
            email: "pas-un-email".into(),
            password: "x".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_change_password_must_differ() {
        let same = ChangePasswordRequest {
            current_password: "motdepasse".into(),
            new_password: "motdepasse".into(),
        };
        assert!(same.validate().is_err());

        let different = ChangePasswordRequest {
            current_password: "ancienmdp".into(),
            new_password: "nouveaumdp".into(),
        };
        assert!(different.validate().is_ok());
    }
}
