use std::path::PathBuf;
use std::sync::Arc;

use crate::lookup::LookupService;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<LookupService>,
    pub verification_file: Option<Arc<PathBuf>>,
}
