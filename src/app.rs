// src/app.rs

use crate::config::AppConfig;
use crate::db::Database;
use crate::domain::filter::FilterEngine;
use crate::domain::statistics::StatisticsAggregator;

/// Everything a request handler needs, shared by all worker threads.
#[derive(Debug, Clone)]
pub struct App {
    pub db: Database,
    pub config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            db: Database::new(&config.database.path),
            config,
        }
    }

    pub fn filter_engine(&self) -> FilterEngine {
        FilterEngine::new(self.config.search_rules())
    }

    pub fn stats(&self) -> StatisticsAggregator<'_> {
        StatisticsAggregator::new(&self.db)
    }
}
