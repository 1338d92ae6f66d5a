//! 싱글톤 서비스 레지스트리
//!
//! `#[service(name = "...")]`, `#[repository(name = "...")]` 매크로로 선언된 컴포넌트는
//! `inventory`를 통해 컴파일 타임에 등록되고, 처음 요청될 때 한 번만 생성됩니다.
//!
//! 조회 규칙: 타입 이름에서 `Service` / `Repository` 접미사를 제거하고 소문자로 바꾼 값이
//! 매크로의 `name` 인자와 같아야 합니다. (`FileStorageService` → `"filestorage"`)
//!
//! 인프라 객체(`Database`, `RedisClient`)는 매크로 없이 [`ServiceLocator::set`]으로
//! 애플리케이션 시작 시 등록합니다.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::utils::display_terminal::{
    log_boxed_title, log_final_summary, log_registry_cache, log_step_complete, log_step_start,
    log_sub_task,
};

/// `#[service]` 매크로가 구현하는 trait
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 구현하는 trait
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;
    fn collection_name(&self) -> &str;
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 등록 이름(`user_service`) → 정규화된 이름(`user`) 인덱스
static SERVICE_INDEX: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let index: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (strip_registration_suffix(registration.name), registration))
        .collect();
    log_registry_cache("Service", index.len());
    index
});

static REPOSITORY_INDEX: Lazy<HashMap<String, &'static RepositoryRegistration>> =
    Lazy::new(|| {
        let index: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
            .map(|registration| (strip_registration_suffix(registration.name), registration))
            .collect();
        log_registry_cache("Repository", index.len());
        index
    });

thread_local! {
    // 순환 의존성은 항상 같은 스레드의 생성 호출 스택에서 발생함
    static RESOLVING: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

fn strip_registration_suffix(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// `crate::a::b::UserService` → `UserService`
fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 조회 대상 종류와 정규화된 이름
#[derive(Debug, PartialEq)]
enum Lookup {
    Repository(String),
    Service(String),
}

fn classify(short_name: &str) -> Option<Lookup> {
    if let Some(base) = short_name.strip_suffix("Repository") {
        return Some(Lookup::Repository(base.to_lowercase()));
    }
    short_name
        .strip_suffix("Service")
        .map(|base| Lookup::Service(base.to_lowercase()))
}

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
});

impl ServiceLocator {
    /// 타입 `T`의 싱글톤 인스턴스 조회
    ///
    /// 캐시에 없으면 등록된 생성자를 **락 밖에서** 호출하므로, 생성자 안에서
    /// 다른 컴포넌트를 다시 조회해도 교착 상태가 발생하지 않습니다.
    ///
    /// # Panics
    ///
    /// 등록되지 않은 타입이거나 순환 의존성이 있을 때. 두 경우 모두
    /// 애플리케이션 구성 오류이므로 시작 단계에서 즉시 드러나야 합니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        match Self::try_get::<T>() {
            Ok(instance) => instance,
            Err(message) => {
                log::error!("{}", message);
                panic!("{}", message);
            }
        }
    }

    /// [`get`](Self::get)의 비패닉 버전
    pub fn try_get<T: 'static + Send + Sync>() -> Result<Arc<T>, String> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::cached::<T>(type_id) {
            return Ok(instance);
        }

        let newly_marked = RESOLVING.with(|set| set.borrow_mut().insert(type_id));
        if !newly_marked {
            return Err(format!("Circular dependency detected while resolving {}", type_name));
        }

        let built = Self::construct::<T>(type_name);
        RESOLVING.with(|set| set.borrow_mut().remove(&type_id));
        let instance = built?;

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // 다른 스레드가 먼저 등록했다면 그 인스턴스를 유지
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance.clone() as Arc<dyn Any + Send + Sync>)
            .clone();
        drop(instances);

        stored
            .downcast::<T>()
            .map_err(|_| format!("Type mismatch in ServiceLocator for {}", type_name))
    }

    fn cached<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances
            .get(&type_id)
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Result<Arc<T>, String> {
        let short_name = short_type_name(type_name);

        let boxed = match classify(short_name) {
            Some(Lookup::Repository(key)) => REPOSITORY_INDEX
                .get(&key)
                .map(|registration| (registration.constructor)())
                .ok_or_else(|| format!("No repository registered under '{}' ({})", key, type_name))?,
            Some(Lookup::Service(key)) => SERVICE_INDEX
                .get(&key)
                .map(|registration| (registration.constructor)())
                .ok_or_else(|| format!("No service registered under '{}' ({})", key, type_name))?,
            None => {
                return Err(format!(
                    "{} is not a #[service]/#[repository] type; register it with ServiceLocator::set()",
                    type_name
                ));
            }
        };

        boxed
            .downcast::<Arc<T>>()
            .map(|arc| *arc)
            .map_err(|_| format!("Registered constructor for {} returned another type", type_name))
    }

    /// 매크로 밖에서 생성한 인스턴스(데이터베이스, 캐시 클라이언트 등) 등록
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", short_type_name(type_name));

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 미리 생성
    ///
    /// 요청 처리 중 첫 생성 비용이 들지 않도록 서버 시작 전에 호출합니다.
    /// `Database`와 `RedisClient`가 먼저 [`set`](Self::set)되어 있어야 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        log_boxed_title("INITIALIZING SERVICE REGISTRY");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        if !repositories.is_empty() {
            log_step_start(1, "Creating repository instances");
            for registration in &repositories {
                let _ = (registration.constructor)();
                log_sub_task(registration.name, "created");
            }
            log_step_complete(1, "Repository instances created", repositories.len());
        }

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        if !services.is_empty() {
            log_step_start(2, "Creating service instances");
            for registration in &services {
                let _ = (registration.constructor)();
                log_sub_task(registration.name, "created");
            }
            log_step_complete(2, "Service instances created", services.len());
        }

        log_final_summary(repositories.len(), services.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClockSettings {
        offset: i64,
    }

    #[test]
    fn test_registration_suffix_is_stripped() {
        assert_eq!(strip_registration_suffix("user_service"), "user");
        assert_eq!(strip_registration_suffix("verificationtoken_repository"), "verificationtoken");
        assert_eq!(strip_registration_suffix("plain"), "plain");
    }

    #[test]
    fn test_type_names_are_classified() {
        assert_eq!(
            classify(short_type_name("scolab_backend::services::files::FileStorageService")),
            Some(Lookup::Service("filestorage".to_string()))
        );
        assert_eq!(
            classify("VerificationTokenRepository"),
            Some(Lookup::Repository("verificationtoken".to_string()))
        );
        assert_eq!(classify("Database"), None);
    }

    #[test]
    fn test_manually_registered_instance_is_returned() {
        ServiceLocator::set(Arc::new(ClockSettings { offset: 42 }));
        let settings = ServiceLocator::get::<ClockSettings>();
        assert_eq!(settings.offset, 42);
    }

    #[test]
    fn test_unregistered_plain_type_is_an_error() {
        struct Unknown;
        assert!(ServiceLocator::try_get::<Unknown>().is_err());
    }
}
