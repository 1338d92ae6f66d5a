//! 공통 유틸리티
//!
//! - [`string_utils`] - 요청 문자열 정리, 파일명 정규화
//! - [`time_utils`] - BSON/chrono 날짜 변환
//! - [`display_terminal`] - 시작 로그 포맷팅

pub mod display_terminal;
pub mod string_utils;
pub mod time_utils;
