use db::DbService;
use services::services::task::TaskService;

pub mod error;
pub mod http;
pub mod routes;

/// Process-wide wiring, assembled once at startup and handed to the
/// router as axum state. Handlers reach the service through this; the
/// service holds the database handle. No ambient lookup anywhere.
#[derive(Clone)]
pub struct AppState {
    tasks: TaskService,
}

impl AppState {
    pub fn new(db: DbService) -> Self {
        Self {
            tasks: TaskService::new(db),
        }
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }
}
