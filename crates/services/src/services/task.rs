use db::{
    DbService,
    models::task::{Task, TaskData, TaskError},
};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

pub type Result<T> = std::result::Result<T, TaskError>;

/// Wire-facing projection of a task. `title` and `status` default to
/// the empty string on deserialization so that a missing field is
/// rejected by validation (400) rather than by the body parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title,
            description: task.description,
            status: task.status,
        }
    }
}

impl TaskDto {
    /// Projection onto the persistence payload; drops any
    /// caller-supplied id.
    fn to_data(&self) -> TaskData {
        TaskData {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TaskService {
    db: DbService,
}

impl TaskService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskDto>> {
        tracing::info!("Listing all tasks");
        let tasks = Task::find_all(&self.db.conn).await?;
        if tasks.is_empty() {
            tracing::warn!("No tasks found");
        }
        Ok(tasks.into_iter().map(TaskDto::from).collect())
    }

    pub async fn get_task(&self, id: i64) -> Result<TaskDto> {
        tracing::info!(task_id = id, "Fetching task");
        match Task::find_by_id(&self.db.conn, id).await? {
            Some(task) => {
                tracing::info!(task_id = id, title = %task.title, "Task found");
                Ok(task.into())
            }
            None => {
                tracing::error!(task_id = id, "Task not found");
                Err(TaskError::NotFound(id))
            }
        }
    }

    pub async fn create_task(&self, payload: &TaskDto) -> Result<TaskDto> {
        validate(payload)?;
        tracing::info!(title = %payload.title, "Creating task");
        let created = Task::create(&self.db.conn, &payload.to_data()).await?;
        tracing::info!(task_id = created.id, title = %created.title, "Task created");
        Ok(created.into())
    }

    /// Overwrites title, description and status of the task at `id`.
    /// The path id always wins over any id carried in the payload.
    pub async fn update_task(&self, id: i64, payload: &TaskDto) -> Result<TaskDto> {
        tracing::info!(task_id = id, "Updating task");
        if !Task::exists_by_id(&self.db.conn, id).await? {
            tracing::error!(task_id = id, "Task not found for update");
            return Err(TaskError::NotFound(id));
        }
        validate(payload)?;
        let updated = Task::update(&self.db.conn, id, &payload.to_data()).await?;
        tracing::info!(task_id = id, title = %updated.title, "Task updated");
        Ok(updated.into())
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        tracing::info!(task_id = id, "Deleting task");
        if !Task::exists_by_id(&self.db.conn, id).await? {
            tracing::error!(task_id = id, "Task not found for deletion");
            return Err(TaskError::NotFound(id));
        }
        Task::delete(&self.db.conn, id).await?;
        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Exact-match filter; an empty result is a valid outcome at this
    /// layer (the HTTP boundary decides how to report it).
    pub async fn list_tasks_by_status(&self, status: &str) -> Result<Vec<TaskDto>> {
        tracing::info!(status, "Listing tasks by status");
        let tasks = Task::find_by_status(&self.db.conn, status).await?;
        if tasks.is_empty() {
            tracing::warn!(status, "No tasks with requested status");
        } else {
            tracing::info!(status, count = tasks.len(), "Tasks found by status");
        }
        Ok(tasks.into_iter().map(TaskDto::from).collect())
    }
}

fn validate(payload: &TaskDto) -> Result<()> {
    if payload.title.trim().is_empty() {
        return Err(TaskError::InvalidData(
            "Task title must not be empty".to_string(),
        ));
    }
    if payload.title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::InvalidData(format!(
            "Task title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if let Some(description) = payload.description.as_deref() {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(TaskError::InvalidData(format!(
                "Task description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
    }
    if payload.status.trim().is_empty() {
        return Err(TaskError::InvalidData(
            "Task status must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn test_service() -> (TempDir, TaskService) {
        let dir = TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("db.sqlite").to_string_lossy()
        );
        let db = DbService::new(&url).await.unwrap();
        (dir, TaskService::new(db))
    }

    fn dto(title: &str, status: &str) -> TaskDto {
        TaskDto {
            id: None,
            title: title.to_string(),
            description: None,
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_dir, service) = test_service().await;

        let created = service
            .create_task(&TaskDto {
                id: None,
                title: "Buy milk".to_string(),
                description: Some("2 liters".to_string()),
                status: "pending".to_string(),
            })
            .await
            .unwrap();

        let id = created.id.unwrap();
        let fetched = service.get_task(id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.description.as_deref(), Some("2 liters"));
        assert_eq!(fetched.status, "pending");
    }

    #[tokio::test]
    async fn create_ignores_caller_supplied_id() {
        let (_dir, service) = test_service().await;

        let mut payload = dto("task", "pending");
        payload.id = Some(999);

        let created = service.create_task(&payload).await.unwrap();
        assert_eq!(created.id, Some(1));
    }

    #[tokio::test]
    async fn create_with_blank_title_persists_nothing() {
        let (_dir, service) = test_service().await;

        for title in ["", "   "] {
            let err = service.create_task(&dto(title, "pending")).await.unwrap_err();
            assert!(matches!(err, TaskError::InvalidData(_)));
        }

        assert!(service.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_enforces_field_length_limits() {
        let (_dir, service) = test_service().await;

        let long_title = "t".repeat(MAX_TITLE_LEN + 1);
        let err = service
            .create_task(&dto(&long_title, "pending"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidData(_)));

        let mut payload = dto("ok", "pending");
        payload.description = Some("d".repeat(MAX_DESCRIPTION_LEN + 1));
        let err = service.create_task(&payload).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidData(_)));

        // Exactly at the limits is accepted.
        let mut payload = dto(&"t".repeat(MAX_TITLE_LEN), "pending");
        payload.description = Some("d".repeat(MAX_DESCRIPTION_LEN));
        assert!(service.create_task(&payload).await.is_ok());
    }

    #[tokio::test]
    async fn create_with_blank_status_is_rejected() {
        let (_dir, service) = test_service().await;

        let err = service.create_task(&dto("task", "")).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidData(_)));
    }

    #[tokio::test]
    async fn operations_on_missing_id_are_not_found() {
        let (_dir, service) = test_service().await;

        assert!(matches!(
            service.get_task(42).await.unwrap_err(),
            TaskError::NotFound(42)
        ));
        assert!(matches!(
            service.update_task(42, &dto("x", "pending")).await.unwrap_err(),
            TaskError::NotFound(42)
        ));
        assert!(matches!(
            service.delete_task(42).await.unwrap_err(),
            TaskError::NotFound(42)
        ));
    }

    #[tokio::test]
    async fn update_preserves_path_id_over_payload_id() {
        let (_dir, service) = test_service().await;

        let created = service.create_task(&dto("original", "pending")).await.unwrap();
        let id = created.id.unwrap();

        let mut payload = dto("renamed", "done");
        payload.id = Some(12345);

        let updated = service.update_task(id, &payload).await.unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.status, "done");

        // The payload id never created or touched another row.
        assert_eq!(service.list_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_irreversible() {
        let (_dir, service) = test_service().await;

        let created = service.create_task(&dto("ephemeral", "pending")).await.unwrap();
        let id = created.id.unwrap();

        service.delete_task(id).await.unwrap();
        assert!(matches!(
            service.get_task(id).await.unwrap_err(),
            TaskError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_by_status_filters_exactly() {
        let (_dir, service) = test_service().await;

        service.create_task(&dto("a", "done")).await.unwrap();
        service.create_task(&dto("b", "pending")).await.unwrap();
        service.create_task(&dto("c", "done")).await.unwrap();

        let done = service.list_tasks_by_status("done").await.unwrap();
        assert_eq!(
            done.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        assert!(service.list_tasks_by_status("Done").await.unwrap().is_empty());
        assert!(
            service
                .list_tasks_by_status("archived")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn dto_deserializes_with_missing_optional_fields() {
        let dto: TaskDto = serde_json::from_str(r#"{"title":"t","status":"pending"}"#).unwrap();
        assert_eq!(dto.id, None);
        assert_eq!(dto.description, None);

        // Missing title/status become empty strings for validation to reject.
        let dto: TaskDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.title, "");
        assert_eq!(dto.status, "");
    }
}
