use std::sync::Arc;

use bcrypt::{hash, verify};
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    config::PasswordConfig,
    domain::{
        dto::{auth::RegisterRequest, users::UpdateUserRequest},
        entities::users::{Role, User, UserProfile},
    },
    errors::AppError,
    repositories::{tokens::TokenRepository, users::UserRepository},
    services::files::FileStorageService,
    utils::string_utils::clean_optional_string,
};

/// 사용자 계정 관리
///
/// 회원가입/관리자 생성/교수의 학생 등록이 모두 [`UserService::create_user`]를 거칩니다.
/// `ADMIN` 계정은 삭제, 비활성화, 역할 강등이 불가능합니다.
#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    token_repo: Arc<TokenRepository>,
    file_storage: Arc<FileStorageService>,
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let start = std::time::Instant::now();
    let password_hash = hash(password, PasswordConfig::bcrypt_cost())
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
    log::debug!("Password hashing took: {:?}", start.elapsed());
    Ok(password_hash)
}

/// 비어 있지 않은 필드만 반영. 역할 전용 필드는 프로필 종류가 맞을 때만 적용
pub(crate) fn apply_update(user: &mut User, request: UpdateUserRequest) {
    if let Some(last_name) = request.last_name {
        user.last_name = last_name;
    }
    if let Some(first_name) = request.first_name {
        user.first_name = first_name;
    }
    if request.phone.is_some() {
        user.phone = request.phone;
    }
    if request.faculty.is_some() {
        user.faculty = request.faculty;
    }
    if let Some(departments) = request.departments {
        user.departments = departments
            .into_iter()
            .filter_map(|d| clean_optional_string(Some(d)))
            .collect();
    }
    if let Some(is_active) = request.is_active {
        user.is_active = is_active;
    }

    match &mut user.profile {
        UserProfile::Student { level, field_of_study } => {
            if request.level.is_some() {
                *level = request.level;
            }
            if request.field_of_study.is_some() {
                *field_of_study = request.field_of_study;
            }
        }
        UserProfile::Teacher { specialty, .. } => {
            if request.specialty.is_some() {
                *specialty = request.specialty;
            }
        }
        UserProfile::Admin => {}
    }

    user.touch();
}

fn guard_admin(user: &User, action: &str) -> Result<(), AppError> {
    if user.is_admin() {
        return Err(AppError::AuthorizationError(format!(
            "Impossible de {} un compte administrateur",
            action
        )));
    }
    Ok(())
}

impl UserService {
    /// 로컬 계정 생성. 이메일 중복이면 `ConflictError`
    pub async fn create_user(&self, request: RegisterRequest, role: Role) -> Result<User, AppError> {
        let password_hash = hash_password(&request.password)?;

        let mut user = User::new_local(
            request.last_name.trim().to_string(),
            request.first_name.trim().to_string(),
            request.email,
            password_hash,
            role,
        );
        apply_update(
            &mut user,
            UpdateUserRequest {
                phone: request.phone,
                faculty: request.faculty,
                departments: Some(request.departments),
                level: request.level,
                field_of_study: request.field_of_study,
                specialty: request.specialty,
                ..Default::default()
            },
        );

        self.user_repo.create(user).await
    }

    /// 이메일/비밀번호 확인. 비활성 계정은 `AuthorizationError`
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AppError> {
        let invalid = || AppError::AuthenticationError("Email ou mot de passe incorrect".to_string());

        let user = self.user_repo.find_by_email(email).await?.ok_or_else(invalid)?;

        if !user.can_authenticate_with_password() {
            return Err(AppError::AuthenticationError(
                "Ce compte utilise une connexion Google".to_string(),
            ));
        }

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::InternalError("비밀번호 해시가 없습니다".to_string()))?;

        let start = std::time::Instant::now();
        let is_valid = verify(password, password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        log::debug!("Password verification took: {:?}", start.elapsed());

        if !is_valid {
            return Err(invalid());
        }

        if !user.is_active {
            return Err(AppError::AuthorizationError("Ce compte est désactivé".to_string()));
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        self.user_repo.get_by_id(id).await
    }

    async fn get_with_role(&self, id: &str, role: Role) -> Result<User, AppError> {
        let user = self.user_repo.get_by_id(id).await?;
        if user.role != role {
            return Err(AppError::NotFound(match role {
                Role::Etudiant => format!("Étudiant introuvable : {}", id),
                Role::Enseignant => format!("Enseignant introuvable : {}", id),
                Role::Admin => format!("Administrateur introuvable : {}", id),
            }));
        }
        Ok(user)
    }

    pub async fn get_student(&self, id: &str) -> Result<User, AppError> {
        self.get_with_role(id, Role::Etudiant).await
    }

    pub async fn get_teacher(&self, id: &str) -> Result<User, AppError> {
        self.get_with_role(id, Role::Enseignant).await
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        self.user_repo.find_by_role(role).await
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.find_all().await
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<User>, AppError> {
        self.user_repo.search(keyword).await
    }

    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> Result<User, AppError> {
        let mut user = self.user_repo.get_by_id(id).await?;
        let deactivating = request.is_active == Some(false);
        if deactivating {
            guard_admin(&user, "désactiver")?;
        }

        apply_update(&mut user, request);
        self.user_repo.save(&user).await?;
        if deactivating {
            self.token_repo.delete_refresh_token(id).await?;
        }

        log::info!("사용자 수정 - id: {}", id);
        Ok(user)
    }

    /// 특정 역할의 사용자만 수정 (교수/학생 전용 엔드포인트)
    pub async fn update_with_role(
        &self,
        id: &str,
        role: Role,
        request: UpdateUserRequest,
    ) -> Result<User, AppError> {
        self.get_with_role(id, role).await?;
        self.update_user(id, request).await
    }

    pub async fn set_active(&self, id: &str, active: bool) -> Result<User, AppError> {
        let mut user = self.user_repo.get_by_id(id).await?;
        if !active {
            guard_admin(&user, "désactiver")?;
        }

        user.is_active = active;
        user.touch();
        self.user_repo.save(&user).await?;

        // 비활성화된 계정은 토큰을 갱신할 수 없음
        if !active {
            self.token_repo.delete_refresh_token(id).await?;
        }

        log::info!("사용자 활성 상태 변경 - id: {}, active: {}", id, active);
        Ok(user)
    }

    pub async fn change_role(&self, id: &str, role: Role) -> Result<User, AppError> {
        let mut user = self.user_repo.get_by_id(id).await?;
        if user.is_admin() && role != Role::Admin {
            return Err(AppError::AuthorizationError(
                "Impossible de rétrograder un compte administrateur".to_string(),
            ));
        }

        user.set_role(role);
        self.user_repo.save(&user).await?;

        log::info!("사용자 역할 변경 - id: {}, role: {}", id, role);
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let user = self.user_repo.get_by_id(id).await?;
        guard_admin(&user, "supprimer")?;

        if !self.user_repo.delete(&user).await? {
            return Err(AppError::NotFound(format!("Utilisateur introuvable : {}", id)));
        }

        if let Some(photo) = user.profile_photo_url.as_deref() {
            if let Err(e) = self.file_storage.delete_by_url(photo).await {
                log::warn!("프로필 사진 삭제 실패 - {}: {}", photo, e);
            }
        }

        log::info!("사용자 삭제 - id: {}, email: {}", id, user.email);
        Ok(())
    }

    pub async fn record_login(&self, user: &mut User) -> Result<(), AppError> {
        user.last_login_at = Some(DateTime::now());
        self.user_repo.save(user).await
    }

    /// 새 사진을 저장한 뒤 이전 사진을 삭제
    pub async fn update_profile_photo(
        &self,
        id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<User, AppError> {
        let mut user = self.user_repo.get_by_id(id).await?;
        let stored = self.file_storage.store_image(original_name, bytes).await?;

        let previous = user.profile_photo_url.replace(stored.url);
        user.touch();
        self.user_repo.save(&user).await?;

        if let Some(previous) = previous {
            if let Err(e) = self.file_storage.delete_by_url(&previous).await {
                log::warn!("이전 프로필 사진 삭제 실패 - {}: {}", previous, e);
            }
        }

        Ok(user)
    }

    pub async fn update_password(&self, user: &mut User, new_password: &str) -> Result<(), AppError> {
        user.password_hash = Some(hash_password(new_password)?);
        user.touch();
        self.user_repo.save(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> User {
        User::new_local(
            "Diallo".into(),
            "Awa".into(),
            "awa@univ.fr".into(),
            "hash".into(),
            Role::Etudiant,
        )
    }

    #[test]
    fn test_apply_update_only_touches_given_fields() {
        let mut user = student();
        user.phone = Some("0600000000".into());

        apply_update(
            &mut user,
            UpdateUserRequest {
                first_name: Some("Aïssatou".into()),
                departments: Some(vec!["Info".into(), "  ".into()]),
                level: Some("M1".into()),
                specialty: Some("Réseaux".into()),
                ..Default::default()
            },
        );

        assert_eq!(user.first_name, "Aïssatou");
        assert_eq!(user.last_name, "Diallo");
        assert_eq!(user.phone.as_deref(), Some("0600000000"));
        assert_eq!(user.departments, vec!["Info".to_string()]);
        assert_eq!(
            user.profile,
            UserProfile::Student {
                level: Some("M1".into()),
                field_of_study: None
            }
        );
    }

    #[test]
    fn test_teacher_specialty_update() {
        let mut user = student();
        user.set_role(Role::Enseignant);
        apply_update(
            &mut user,
            UpdateUserRequest {
                specialty: Some("Compilation".into()),
                level: Some("L3".into()),
                ..Default::default()
            },
        );
        assert!(matches!(
            user.profile,
            UserProfile::Teacher { specialty: Some(ref s), .. } if s == "Compilation"
        ));
    }

    #[test]
    fn test_admin_guard() {
        let mut user = student();
        assert!(guard_admin(&user, "supprimer").is_ok());

        user.set_role(Role::Admin);
        assert!(matches!(
            guard_admin(&user, "supprimer"),
            Err(AppError::AuthorizationError(_))
        ));
    }

    #[test]
    fn test_hash_password_verifies() {
        let hashed = hash_password("motdepasse").unwrap();
        assert!(verify("motdepasse", &hashed).unwrap());
        assert!(!verify("autre", &hashed).unwrap());
    }
}
