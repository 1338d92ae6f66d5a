use std::sync::Arc;

use singleton_macro::service;

use crate::{
    domain::{
        dto::{
            messaging::{
                ChatMessageResponse, ConversationResponse, GroupMembersResponse, MarkReadResponse,
                SendMessageRequest, UnreadCountResponse,
            },
            users::UserSummary,
        },
        entities::{
            groups::Group,
            messaging::{Conversation, Message},
            users::Role,
        },
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{
        groups::GroupRepository,
        messaging::{ConversationRepository, MessageRepository},
        users::UserRepository,
    },
    utils::string_utils::require_text,
};

/// 그룹-교수 대화방 메시징
///
/// 대화방 참여자는 담당 교수와 그룹 학생입니다. 조회와 생성 모두 참여자 본인만 가능합니다.
#[service(name = "messaging")]
pub struct MessagingService {
    conversation_repo: Arc<ConversationRepository>,
    message_repo: Arc<MessageRepository>,
    group_repo: Arc<GroupRepository>,
    user_repo: Arc<UserRepository>,
}

fn is_participant(conversation: &Conversation, group: &Group, user_id: &str) -> bool {
    conversation.teacher_id == user_id || group.has_student(user_id)
}

fn forbidden(message: &str) -> AppError {
    AppError::AuthorizationError(message.to_string())
}

/// 다른 사용자의 대화 목록은 볼 수 없음
fn ensure_self(caller: &AuthenticatedUser, user_id: &str) -> Result<(), AppError> {
    if caller.user_id == user_id {
        Ok(())
    } else {
        Err(forbidden("Vous ne pouvez consulter que vos propres conversations"))
    }
}

/// 그룹 학생이거나 교수
fn ensure_group_access(caller: &AuthenticatedUser, group: &Group) -> Result<(), AppError> {
    if caller.is(Role::Enseignant) || group.has_student(&caller.user_id) {
        Ok(())
    } else {
        Err(forbidden("Vous n'appartenez pas à ce groupe"))
    }
}

/// 대화방을 여는 사람은 그 교수 본인이거나 그룹 학생
fn ensure_can_open(caller: &AuthenticatedUser, group: &Group, teacher_id: &str) -> Result<(), AppError> {
    if caller.user_id == teacher_id || group.has_student(&caller.user_id) {
        Ok(())
    } else {
        Err(forbidden("Vous ne pouvez pas ouvrir cette conversation"))
    }
}

fn to_responses(conversations: Vec<Conversation>) -> Vec<ConversationResponse> {
    conversations.into_iter().map(ConversationResponse::from).collect()
}

impl MessagingService {
    async fn accessible_conversation(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
    ) -> Result<Conversation, AppError> {
        let conversation = self
            .conversation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation introuvable : {}", id)))?;

        let group = self.group_repo.get_by_id(&conversation.group_id).await?;
        if !is_participant(&conversation, &group, &caller.user_id) {
            return Err(forbidden("Vous ne participez pas à cette conversation"));
        }
        Ok(conversation)
    }

    /// (그룹, 교수) 쌍의 대화방을 반환하고 없으면 생성
    pub async fn create_or_get(
        &self,
        caller: &AuthenticatedUser,
        group_id: &str,
        teacher_id: &str,
    ) -> Result<ConversationResponse, AppError> {
        let group = self.group_repo.get_by_id(group_id).await?;
        ensure_can_open(caller, &group, teacher_id)?;

        if let Some(existing) = self
            .conversation_repo
            .find_by_group_and_teacher(group_id, teacher_id)
            .await?
        {
            return Ok(existing.into());
        }

        let teacher = self.user_repo.get_by_id(teacher_id).await?;
        if teacher.role != Role::Enseignant {
            return Err(AppError::ValidationError(
                "Une conversation doit être rattachée à un enseignant".to_string(),
            ));
        }

        let conversation = self
            .conversation_repo
            .create_or_existing(Conversation::new(group_id.to_string(), teacher_id.to_string()))
            .await?;

        log::info!("대화방 생성 - group_id: {}, teacher_id: {}", group_id, teacher_id);
        Ok(conversation.into())
    }

    /// 학생은 그룹의 모든 대화방, 교수는 그중 자기 대화방만
    pub async fn by_group(
        &self,
        caller: &AuthenticatedUser,
        group_id: &str,
    ) -> Result<Vec<ConversationResponse>, AppError> {
        let group = self.group_repo.get_by_id(group_id).await?;
        ensure_group_access(caller, &group)?;

        let conversations = self
            .conversation_repo
            .find_by_group(group_id)
            .await?
            .into_iter()
            .filter(|c| is_participant(c, &group, &caller.user_id))
            .collect();
        Ok(to_responses(conversations))
    }

    pub async fn by_teacher(
        &self,
        caller: &AuthenticatedUser,
        teacher_id: &str,
    ) -> Result<Vec<ConversationResponse>, AppError> {
        ensure_self(caller, teacher_id)?;
        Ok(to_responses(self.conversation_repo.find_by_teacher(teacher_id).await?))
    }

    /// 교수로 참여한 대화방 + 소속 그룹의 대화방
    pub async fn by_user(
        &self,
        caller: &AuthenticatedUser,
        user_id: &str,
    ) -> Result<Vec<ConversationResponse>, AppError> {
        ensure_self(caller, user_id)?;
        let conversations = self.participant_conversations(user_id).await?;
        Ok(to_responses(conversations))
    }

    async fn participant_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, AppError> {
        let group_ids: Vec<String> = self
            .group_repo
            .find_by_student(user_id)
            .await?
            .iter()
            .filter_map(Group::id_string)
            .collect();
        self.conversation_repo
            .find_for_participant(user_id, &group_ids)
            .await
    }

    pub async fn group_details(
        &self,
        caller: &AuthenticatedUser,
        group_id: &str,
    ) -> Result<GroupMembersResponse, AppError> {
        let group = self.group_repo.get_by_id(group_id).await?;
        ensure_group_access(caller, &group)?;
        let students = self.user_repo.find_by_ids(&group.student_ids).await?;

        Ok(GroupMembersResponse {
            students: students.iter().map(UserSummary::from).collect(),
            group: group.into(),
        })
    }

    pub async fn send(
        &self,
        caller: &AuthenticatedUser,
        request: SendMessageRequest,
    ) -> Result<ChatMessageResponse, AppError> {
        let content = require_text(&request.content, "contenu")?;
        let mut conversation = self
            .accessible_conversation(caller, &request.conversation_id)
            .await?;

        let sender = self.user_repo.get_by_id(&caller.user_id).await?;
        let message = self
            .message_repo
            .create(Message::new(
                request.conversation_id.clone(),
                caller.user_id.clone(),
                sender.full_name(),
                content,
            ))
            .await?;

        conversation.record_message(&message);
        self.conversation_repo.save(&conversation).await?;

        log::debug!("메시지 전송 - conversation_id: {}, sender: {}", request.conversation_id, caller.user_id);
        Ok(ChatMessageResponse::for_reader(message, &caller.user_id))
    }

    /// 보낸 시각 오름차순
    pub async fn messages(
        &self,
        caller: &AuthenticatedUser,
        conversation_id: &str,
    ) -> Result<Vec<ChatMessageResponse>, AppError> {
        self.accessible_conversation(caller, conversation_id).await?;
        let messages = self.message_repo.find_by_conversation(conversation_id).await?;
        Ok(messages
            .into_iter()
            .map(|message| ChatMessageResponse::for_reader(message, &caller.user_id))
            .collect())
    }

    pub async fn mark_read(
        &self,
        caller: &AuthenticatedUser,
        conversation_id: &str,
    ) -> Result<MarkReadResponse, AppError> {
        self.accessible_conversation(caller, conversation_id).await?;
        let updated = self
            .message_repo
            .mark_read(conversation_id, &caller.user_id)
            .await?;
        Ok(MarkReadResponse { updated })
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<UnreadCountResponse, AppError> {
        let conversation_ids: Vec<String> = self
            .participant_conversations(user_id)
            .await?
            .iter()
            .filter_map(Conversation::id_string)
            .collect();

        let unread = self
            .message_repo
            .count_unread(&conversation_ids, user_id)
            .await?;
        Ok(UnreadCountResponse { unread })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;

    fn caller(user_id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user_id.to_string(),
            email: format!("{}@univ.fr", user_id),
            auth_provider: AuthProvider::Local,
            roles: vec![role.as_str().to_string()],
            access_token: String::new(),
            expires_at: 0,
        }
    }

    fn group_with(student_id: &str) -> Group {
        let mut group = Group::new("G1".into(), None);
        group.add_student(student_id);
        group
    }

    #[test]
    fn test_participants() {
        let conversation = Conversation::new("g1".into(), "prof".into());
        let group = group_with("s1");

        assert!(is_participant(&conversation, &group, "prof"));
        assert!(is_participant(&conversation, &group, "s1"));
        assert!(!is_participant(&conversation, &group, "s2"));
        assert!(!is_participant(&conversation, &group, "autre-prof"));
    }

    #[test]
    fn test_conversation_lists_are_own_only() {
        let student = caller("s1", Role::Etudiant);
        assert!(ensure_self(&student, "s1").is_ok());
        assert!(matches!(
            ensure_self(&student, "s2"),
            Err(AppError::AuthorizationError(_))
        ));

        let teacher = caller("prof", Role::Enseignant);
        assert!(ensure_self(&teacher, "prof").is_ok());
        assert!(ensure_self(&teacher, "autre-prof").is_err());
    }

    #[test]
    fn test_group_access_requires_membership_or_teacher() {
        let group = group_with("s1");

        assert!(ensure_group_access(&caller("s1", Role::Etudiant), &group).is_ok());
        assert!(ensure_group_access(&caller("prof", Role::Enseignant), &group).is_ok());
        assert!(matches!(
            ensure_group_access(&caller("s2", Role::Etudiant), &group),
            Err(AppError::AuthorizationError(_))
        ));
    }

    #[test]
    fn test_only_pair_members_open_a_conversation() {
        let group = group_with("s1");

        assert!(ensure_can_open(&caller("s1", Role::Etudiant), &group, "prof").is_ok());
        assert!(ensure_can_open(&caller("prof", Role::Enseignant), &group, "prof").is_ok());
        assert!(ensure_can_open(&caller("s2", Role::Etudiant), &group, "prof").is_err());
        assert!(ensure_can_open(&caller("autre-prof", Role::Enseignant), &group, "prof").is_err());
    }
}
