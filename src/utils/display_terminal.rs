//! 시작 로그 포맷팅
//!
//! 레지스트리 초기화 진행 상황을 박스/단계 형태로 `log::info!`에 출력합니다.
//! 문자열 생성(`render_*`)과 출력(`log_*`)을 분리해 두어 포맷을 테스트할 수 있습니다.

const BOX_WIDTH: usize = 50;

/// 가운데 정렬된 박스 제목 세 줄 생성
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║          INITIALIZING SERVICE REGISTRY           ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn render_boxed_title(title: &str) -> [String; 3] {
    let border = "═".repeat(BOX_WIDTH);
    [
        format!("╔{}╗", border),
        format!("║{:^width$}║", title, width = BOX_WIDTH),
        format!("╚{}╝", border),
    ]
}

pub fn render_step(step: u8, description: &str, count: Option<usize>) -> String {
    match count {
        Some(count) => format!("[{}] ✓ {} ({})", step, description, count),
        None => format!("[{}] {}...", step, description),
    }
}

pub fn log_boxed_title(title: &str) {
    for line in render_boxed_title(title) {
        log::info!("{}", line);
    }
}

pub fn log_step_start(step: u8, description: &str) {
    log::info!("{}", render_step(step, description, None));
}

pub fn log_step_complete(step: u8, description: &str, count: usize) {
    log::info!("{}", render_step(step, description, Some(count)));
}

pub fn log_sub_task(name: &str, status: &str) {
    log::debug!("    ├─ {:<32} {}", name, status);
}

pub fn log_final_summary(repositories: usize, services: usize) {
    log::info!(
        "✅ Registry ready: {} repositories, {} services",
        repositories,
        services
    );
}

pub fn log_registry_cache(kind: &str, count: usize) {
    log::debug!("{} registry index built with {} entries", kind, count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_title_lines_have_equal_width() {
        let lines = render_boxed_title("SCOLAB");
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert_eq!(widths, vec![BOX_WIDTH + 2; 3]);
        assert!(lines[1].contains("SCOLAB"));
    }

    #[test]
    fn test_render_step() {
        assert_eq!(render_step(1, "Creating", None), "[1] Creating...");
        assert_eq!(render_step(2, "Created", Some(9)), "[2] ✓ Created (9)");
    }
}
