//! # Data Transfer Objects
//!
//! API 경계에서 주고받는 요청/응답 구조체입니다.
//!
//! - `request`: `validator`로 형식을 검증하는 입력 DTO. 핸들러에서 `payload.validate()?` 호출
//! - `response`: 엔티티에서 `From`으로 변환되는 출력 DTO. 날짜는 RFC 3339 문자열(chrono)로 직렬화
//!
//! 요청/응답 본문은 snake_case JSON이고, 열거형 값은 `A_SOUMETTRE`, `ETUDIANT`처럼
//! 대문자 프랑스어 태그를 그대로 사용합니다.
//!
//! ```text
//! dto/
//! ├── auth/            # 회원가입, 로그인, 토큰, 비밀번호 흐름
//! ├── users/           # 사용자 관리, 프로필, 관리자 통계
//! ├── projects/        # 프로젝트와 태스크
//! ├── deliverables/    # 산출물 제출/평가
//! ├── groups/          # 학생 그룹
//! ├── messaging/       # 대화방과 메시지
//! └── notifications/   # 알림 발송과 인앱 알림
//! ```

pub mod auth;
pub mod deliverables;
pub mod groups;
pub mod messaging;
pub mod notifications;
pub mod projects;
pub mod users;

use serde::Serialize;

/// 단순 결과 메시지 응답
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
