use std::sync::Arc;

use pocketledger_core::{
    analytics::{AnalyticsService, AnalyticsServiceTrait},
    budgets::{BudgetService, BudgetServiceTrait},
    categories::{CategoryService, CategoryServiceTrait},
    stocks::{StockService, StockServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::{UserService, UserServiceTrait},
};
use pocketledger_market_data::{MarketDataProvider, RapidApiYahooProvider};
use pocketledger_storage_sqlite::{
    db::{self, write_actor},
    BudgetRepository, CategoryRepository, StockRepository, TransactionRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{auth::AuthManager, config::Config};

pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub category_service: Arc<dyn CategoryServiceTrait + Send + Sync>,
    pub transaction_service: Arc<dyn TransactionServiceTrait + Send + Sync>,
    pub budget_service: Arc<dyn BudgetServiceTrait + Send + Sync>,
    pub stock_service: Arc<dyn StockServiceTrait + Send + Sync>,
    pub analytics_service: Arc<dyn AnalyticsServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("PL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let stock_repository = Arc::new(StockRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(user_repository));
    let category_service = Arc::new(CategoryService::new(category_repository.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        category_repository.clone(),
    ));
    let budget_service = Arc::new(BudgetService::new(
        budget_repository,
        category_repository,
        transaction_repository.clone(),
    ));

    // Price refresh is unavailable until an API key is configured
    let quote_provider = config.market_data.as_ref().map(|market| {
        Arc::new(RapidApiYahooProvider::new(
            market.api_key.clone(),
            market.host.clone(),
        )) as Arc<dyn MarketDataProvider>
    });
    if quote_provider.is_none() {
        tracing::warn!("PL_RAPIDAPI_KEY is not set; stock price refresh is disabled");
    }
    let stock_service = Arc::new(StockService::new(stock_repository.clone(), quote_provider));

    let analytics_service = Arc::new(AnalyticsService::new(
        transaction_repository,
        stock_repository,
    ));

    Ok(Arc::new(AppState {
        auth: Arc::new(AuthManager::new(&config.auth)),
        user_service,
        category_service,
        transaction_service,
        budget_service,
        stock_service,
        analytics_service,
    }))
}
