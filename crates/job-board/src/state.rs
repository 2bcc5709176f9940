use std::sync::Arc;

use crate::applications::ApplicationService;
use crate::catalog::CatalogService;
use crate::directory::DirectoryService;
use crate::session::SessionKeys;

/// Services shared by every handler.
#[derive(Clone)]
pub struct BoardState {
    pub directory: Arc<DirectoryService>,
    pub catalog: Arc<CatalogService>,
    pub applications: Arc<ApplicationService>,
    pub sessions: Arc<SessionKeys>,
}
