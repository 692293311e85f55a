use crate::checkin::CheckInService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub checkins: Arc<CheckInService>,
}

impl AppState {
    pub fn new(checkins: CheckInService) -> Self {
        Self {
            checkins: Arc::new(checkins),
        }
    }
}
