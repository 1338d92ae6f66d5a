/// 스코프 접근에 필요한 역할
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(String),
    /// 하나라도 있으면 허용
    Any(Vec<String>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, user_roles: &[String]) -> bool {
        match self {
            RequiredRole::Single(required) => user_roles.contains(required),
            RequiredRole::Any(required) => required.iter().any(|role| user_roles.contains(role)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_role() {
        let required = RequiredRole::Single("ETUDIANT".to_string());
        assert!(required.is_satisfied(&roles(&["ETUDIANT"])));
        assert!(!required.is_satisfied(&roles(&["ENSEIGNANT"])));
        assert!(!required.is_satisfied(&[]));
    }

    #[test]
    fn test_any_role() {
        let required = RequiredRole::Any(roles(&["ENSEIGNANT", "ADMIN"]));
        assert!(required.is_satisfied(&roles(&["ADMIN"])));
        assert!(required.is_satisfied(&roles(&["ENSEIGNANT"])));
        assert!(!required.is_satisfied(&roles(&["ETUDIANT"])));
    }
}
