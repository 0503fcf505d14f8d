//! Stocks module - recorded trades (lots), reconstructed holdings and
//! market price refresh.

mod holdings_calculator;
mod stocks_model;
mod stocks_service;
mod stocks_traits;



pub use holdings_calculator::{open_holdings, reconstruct_holdings, total_open_invested};
pub use stocks_model::{
    merge_position, Holding, NewStockLot, PositionMerge, PriceRefreshResult, StockLot,
    StockLotInput, StockSaveResult, TradeType,
};
pub use stocks_service::StockService;
pub use stocks_traits::{StockRepositoryTrait, StockServiceTrait};
