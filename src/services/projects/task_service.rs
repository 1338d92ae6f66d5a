use std::sync::Arc;

use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    domain::{
        dto::projects::{CreateTaskRequest, TaskResponse, TaskSort, UpdateTaskRequest},
        entities::{
            projects::{Project, Task, TaskStatus},
            users::Role,
        },
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{
        projects::{ProjectRepository, TaskRepository},
        users::UserRepository,
    },
    services::projects::project_service::ensure_can_manage,
    utils::{string_utils::require_text, time_utils::from_chrono},
};

/// 태스크 관리
///
/// 태스크 생성/수정/삭제 후에는 항상 소속 프로젝트의 진행률을 다시 계산해 저장합니다.
#[service(name = "task")]
pub struct TaskService {
    task_repo: Arc<TaskRepository>,
    project_repo: Arc<ProjectRepository>,
    user_repo: Arc<UserRepository>,
}

/// 마감일 오름차순(마감일 없는 태스크는 뒤로) 또는 우선순위 순
pub(crate) fn sort_tasks(tasks: &mut [Task], sort: TaskSort) {
    match sort {
        TaskSort::Date => tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.priority.rank())),
        TaskSort::Priorite => tasks.sort_by_key(|t| (t.priority.rank(), t.due_date.is_none(), t.due_date)),
    }
}

fn apply_update(task: &mut Task, request: UpdateTaskRequest, now: DateTime) {
    if let Some(title) = request.title {
        task.title = title;
    }
    if request.description.is_some() {
        task.description = request.description;
    }
    if let Some(priority) = request.priority {
        task.priority = priority;
    }
    if let Some(start_date) = request.start_date {
        task.start_date = from_chrono(start_date);
    }
    if let Some(due_date) = request.due_date {
        task.due_date = Some(from_chrono(due_date));
    }
    if let Some(status) = request.status {
        task.change_status(status, now);
    }
}

fn to_responses(tasks: Vec<Task>) -> Vec<TaskResponse> {
    tasks.into_iter().map(TaskResponse::from).collect()
}

impl TaskService {
    /// 프로젝트 진행률 재계산
    pub async fn refresh_progress(&self, project_id: &str) -> Result<f64, AppError> {
        let tasks = self.task_repo.find_by_project(project_id).await?;
        let progress = Project::compute_progress(&tasks);
        self.project_repo.update_progress(project_id, progress).await?;

        log::debug!("프로젝트 진행률 갱신 - project_id: {}, progress: {:.1}", project_id, progress);
        Ok(progress)
    }

    async fn ensure_student(&self, student_id: &str) -> Result<(), AppError> {
        let user = self.user_repo.get_by_id(student_id).await?;
        if user.role != Role::Etudiant {
            return Err(AppError::ValidationError(format!(
                "Seul un étudiant peut être affecté à une tâche : {}",
                student_id
            )));
        }
        Ok(())
    }

    async fn managed_task(&self, caller: &AuthenticatedUser, id: &str) -> Result<Task, AppError> {
        let task = self.task_repo.get_by_id(id).await?;
        let project = self.project_repo.get_by_id(&task.project_id).await?;
        ensure_can_manage(&project, caller)?;
        Ok(task)
    }

    /// `project_id`는 경로 값이 우선
    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateTaskRequest,
        project_id: Option<&str>,
    ) -> Result<TaskResponse, AppError> {
        let project_id = project_id
            .map(str::to_string)
            .or(request.project_id)
            .ok_or_else(|| AppError::ValidationError("Le projet de la tâche est obligatoire".to_string()))?;

        let project = self.project_repo.get_by_id(&project_id).await?;
        ensure_can_manage(&project, caller)?;

        let mut task = Task::new(require_text(&request.title, "titre")?, project_id.clone());
        task.description = request.description;
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        if let Some(start_date) = request.start_date {
            task.start_date = from_chrono(start_date);
        }
        task.due_date = request.due_date.map(from_chrono);
        if let Some(status) = request.status {
            task.change_status(status, DateTime::now());
        }
        for student_id in &request.assignee_ids {
            self.ensure_student(student_id).await?;
            task.assign(student_id);
        }

        let task = self.task_repo.create(task).await?;
        self.refresh_progress(&project_id).await?;

        log::info!("태스크 생성 - project_id: {}, title: {}", project_id, task.title);
        Ok(task.into())
    }

    pub async fn get(&self, id: &str) -> Result<TaskResponse, AppError> {
        Ok(self.task_repo.get_by_id(id).await?.into())
    }

    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: UpdateTaskRequest,
    ) -> Result<TaskResponse, AppError> {
        let mut task = self.managed_task(caller, id).await?;

        apply_update(&mut task, request, DateTime::now());
        self.task_repo.save(&task).await?;
        self.refresh_progress(&task.project_id).await?;

        Ok(task.into())
    }

    /// 프로젝트 담당 교수/관리자 또는 태스크에 배정된 학생
    pub async fn change_status(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        status: TaskStatus,
    ) -> Result<TaskResponse, AppError> {
        let mut task = self.task_repo.get_by_id(id).await?;

        let assigned = task.assignee_ids.iter().any(|s| s == &caller.user_id);
        if !assigned {
            let project = self.project_repo.get_by_id(&task.project_id).await?;
            ensure_can_manage(&project, caller)?;
        }

        task.change_status(status, DateTime::now());
        self.task_repo.save(&task).await?;
        self.refresh_progress(&task.project_id).await?;

        log::info!("태스크 상태 변경 - id: {}, status: {}", id, status.as_str());
        Ok(task.into())
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
        let task = self.managed_task(caller, id).await?;

        if !self.task_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Tâche introuvable : {}", id)));
        }
        self.refresh_progress(&task.project_id).await?;

        log::info!("태스크 삭제 - id: {}", id);
        Ok(())
    }

    pub async fn by_project(&self, project_id: &str) -> Result<Vec<TaskResponse>, AppError> {
        self.project_repo.get_by_id(project_id).await?;
        Ok(to_responses(self.task_repo.find_by_project(project_id).await?))
    }

    pub async fn by_project_and_status(
        &self,
        project_id: &str,
        status: TaskStatus,
    ) -> Result<Vec<TaskResponse>, AppError> {
        Ok(to_responses(
            self.task_repo
                .find_by_project_and_status(project_id, status)
                .await?,
        ))
    }

    pub async fn completed_by_project(&self, project_id: &str) -> Result<Vec<TaskResponse>, AppError> {
        self.by_project_and_status(project_id, TaskStatus::Terminee).await
    }

    pub async fn by_student(&self, student_id: &str, sort: TaskSort) -> Result<Vec<TaskResponse>, AppError> {
        let mut tasks = self.task_repo.find_by_assignee(student_id).await?;
        sort_tasks(&mut tasks, sort);
        Ok(to_responses(tasks))
    }

    pub async fn late(&self) -> Result<Vec<TaskResponse>, AppError> {
        Ok(to_responses(self.task_repo.find_late(DateTime::now()).await?))
    }

    pub async fn assign_student(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        student_id: &str,
    ) -> Result<TaskResponse, AppError> {
        let mut task = self.managed_task(caller, id).await?;
        self.ensure_student(student_id).await?;

        if task.assign(student_id) {
            self.task_repo.save(&task).await?;
            log::info!("태스크 배정 - task_id: {}, student_id: {}", id, student_id);
        }
        Ok(task.into())
    }

    pub async fn remove_student(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        student_id: &str,
    ) -> Result<TaskResponse, AppError> {
        let mut task = self.managed_task(caller, id).await?;

        if !task.unassign(student_id) {
            return Err(AppError::NotFound(format!(
                "L'étudiant {} n'est pas affecté à cette tâche",
                student_id
            )));
        }
        self.task_repo.save(&task).await?;

        Ok(task.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::projects::Priority;

    fn task(title: &str, priority: Priority, due: Option<i64>) -> Task {
        let mut task = Task::new(title.into(), "p1".into());
        task.priority = priority;
        task.due_date = due.map(DateTime::from_millis);
        task
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_puts_undated_last() {
        let mut tasks = vec![
            task("sans date", Priority::Haute, None),
            task("tard", Priority::Basse, Some(9_000)),
            task("tôt", Priority::Moyenne, Some(1_000)),
        ];
        sort_tasks(&mut tasks, TaskSort::Date);
        assert_eq!(titles(&tasks), vec!["tôt", "tard", "sans date"]);
    }

    #[test]
    fn test_sort_by_priority() {
        let mut tasks = vec![
            task("basse", Priority::Basse, Some(1_000)),
            task("haute", Priority::Haute, Some(9_000)),
            task("moyenne", Priority::Moyenne, None),
        ];
        sort_tasks(&mut tasks, TaskSort::Priorite);
        assert_eq!(titles(&tasks), vec!["haute", "moyenne", "basse"]);
    }

    #[test]
    fn test_update_to_done_sets_completion() {
        let mut t = task("rapport", Priority::Moyenne, None);
        apply_update(
            &mut t,
            UpdateTaskRequest {
                status: Some(TaskStatus::Terminee),
                title: Some("rapport final".into()),
                ..Default::default()
            },
            DateTime::from_millis(5_000),
        );
        assert_eq!(t.title, "rapport final");
        assert_eq!(t.completed_at, Some(DateTime::from_millis(5_000)));
    }
}
