//! 사용자 엔티티
//!
//! 학생/교수/관리자는 하나의 `users` 컬렉션에 저장됩니다. 역할별 추가 정보는
//! [`UserProfile`] 태그 열거형에 담고, 조회용 `role` 필드는 프로필과 항상 일치하도록
//! 생성자와 [`User::set_role`]에서 함께 갱신합니다.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Etudiant,
    Enseignant,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Etudiant => "ETUDIANT",
            Role::Enseignant => "ENSEIGNANT",
            Role::Admin => "ADMIN",
        }
    }

    /// 대소문자 구분 없이 파싱 (`ROLE_` 접두사 허용)
    pub fn from_str(value: &str) -> Option<Self> {
        let upper = value.trim().to_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ETUDIANT" => Some(Role::Etudiant),
            "ENSEIGNANT" => Some(Role::Enseignant),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 역할별 프로필 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserProfile {
    Student {
        #[serde(default)]
        level: Option<String>,
        #[serde(default)]
        field_of_study: Option<String>,
    },
    Teacher {
        #[serde(default)]
        specialty: Option<String>,
        #[serde(default)]
        supervised_project_ids: Vec<String>,
    },
    Admin,
}

impl UserProfile {
    /// 역할에 맞는 빈 프로필
    pub fn empty_for(role: Role) -> Self {
        match role {
            Role::Etudiant => UserProfile::Student {
                level: None,
                field_of_study: None,
            },
            Role::Enseignant => UserProfile::Teacher {
                specialty: None,
                supervised_project_ids: Vec::new(),
            },
            Role::Admin => UserProfile::Admin,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            UserProfile::Student { .. } => Role::Etudiant,
            UserProfile::Teacher { .. } => Role::Enseignant,
            UserProfile::Admin => Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    /// OAuth 계정은 비밀번호가 없음
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub profile_photo_url: Option<String>,
    pub role: Role,
    pub profile: UserProfile,
    pub is_active: bool,
    pub faculty: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    pub auth_provider: AuthProvider,
    pub provider_id: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub last_login_at: Option<DateTime>,
}

impl User {
    pub fn new_local(
        last_name: String,
        first_name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            last_name,
            first_name,
            email,
            password_hash: Some(password_hash),
            phone: None,
            profile_photo_url: None,
            role,
            profile: UserProfile::empty_for(role),
            is_active: true,
            faculty: None,
            departments: Vec::new(),
            auth_provider: AuthProvider::Local,
            provider_id: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// 외부 제공자가 이미 이메일을 확인했으므로 `email_verified = true`
    pub fn new_oauth(
        last_name: String,
        first_name: String,
        email: String,
        provider: AuthProvider,
        provider_id: String,
        picture: Option<String>,
        role: Role,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            last_name,
            first_name,
            email,
            password_hash: None,
            phone: None,
            profile_photo_url: picture,
            role,
            profile: UserProfile::empty_for(role),
            is_active: true,
            faculty: None,
            departments: Vec::new(),
            auth_provider: provider,
            provider_id: Some(provider_id),
            email_verified: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// 역할 변경 시 프로필 종류도 맞춰서 교체 (같은 종류면 기존 정보 유지)
    pub fn set_role(&mut self, role: Role) {
        if self.profile.role() != role {
            self.profile = UserProfile::empty_for(role);
        }
        self.role = role;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_authenticate_with_password(&self) -> bool {
        self.auth_provider == AuthProvider::Local && self.password_hash.is_some()
    }

    /// JWT `roles` 클레임 값
    pub fn role_claims(&self) -> Vec<String> {
        vec![self.role.as_str().to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(role: Role) -> User {
        User::new_local(
            "Durand".into(),
            "Alice".into(),
            "alice@univ.fr".into(),
            "hash".into(),
            role,
        )
    }

    #[test]
    fn test_new_local_user_defaults() {
        let user = local(Role::Enseignant);
        assert!(user.is_active);
        assert!(!user.email_verified);
        assert!(user.can_authenticate_with_password());
        assert_eq!(user.profile.role(), Role::Enseignant);
        assert_eq!(user.role_claims(), vec!["ENSEIGNANT".to_string()]);
        assert_eq!(user.full_name(), "Alice Durand");
    }

    #[test]
    fn test_oauth_user_cannot_use_password() {
        let user = User::new_oauth(
            "Martin".into(),
            "Bob".into(),
            "bob@gmail.com".into(),
            AuthProvider::Google,
            "google-123".into(),
            None,
            Role::Etudiant,
        );
        assert!(user.email_verified);
        assert!(!user.can_authenticate_with_password());
    }

    #[test]
    fn test_set_role_keeps_profile_in_sync() {
        let mut user = local(Role::Etudiant);
        user.profile = UserProfile::Student {
            level: Some("L3".into()),
            field_of_study: Some("Informatique".into()),
        };

        user.set_role(Role::Etudiant);
        assert!(matches!(user.profile, UserProfile::Student { level: Some(_), .. }));

        user.set_role(Role::Enseignant);
        assert_eq!(user.role, Role::Enseignant);
        assert!(matches!(user.profile, UserProfile::Teacher { .. }));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("etudiant"), Some(Role::Etudiant));
        assert_eq!(Role::from_str("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("professeur"), None);
        assert_eq!(serde_json::to_string(&Role::Enseignant).unwrap(), "\"ENSEIGNANT\"");
    }

    #[test]
    fn test_profile_is_tagged() {
        let json = serde_json::to_value(UserProfile::empty_for(Role::Admin)).unwrap();
        assert_eq!(json["kind"], "admin");
    }
}
