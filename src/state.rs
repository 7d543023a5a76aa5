use std::sync::Arc;

use crate::{log_sink::LogSink, router::RouteTable, storage::TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub log: LogSink,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, log: LogSink) -> Self {
        Self {
            store,
            log,
            routes: Arc::new(RouteTable::todos()),
        }
    }
}
