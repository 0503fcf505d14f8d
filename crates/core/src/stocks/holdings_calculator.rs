//! Reconstructs per-symbol holdings by replaying recorded lots.
//!
//! Buys add quantity and cost. Sells remove cost at the average cost held
//! just before the sale, so a sale never changes the average cost of what
//! remains.

use std::collections::BTreeMap;

use log::warn;
use rust_decimal::Decimal;

use super::stocks_model::{Holding, StockLot, TradeType};

#[derive(Debug, Default)]
struct PositionState {
    name: Option<String>,
    quantity: Decimal,
    invested: Decimal,
    current_price: Option<Decimal>,
    lot_count: usize,
}

impl PositionState {
    fn average_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            self.invested / self.quantity
        } else {
            Decimal::ZERO
        }
    }

    fn apply(&mut self, lot: &StockLot) {
        self.lot_count += 1;
        if lot.name.is_some() {
            self.name = lot.name.clone();
        }
        if lot.current_price.is_some() {
            self.current_price = lot.current_price;
        }

        match lot.trade_type {
            TradeType::Buy => {
                self.quantity += lot.quantity;
                self.invested += lot.quantity * lot.buy_price;
            }
            TradeType::Sell => {
                let held = self.quantity.max(Decimal::ZERO);
                if lot.quantity > held {
                    warn!(
                        "Sell of {} {} exceeds held quantity {}",
                        lot.quantity, lot.symbol, held
                    );
                }
                let removed = lot.quantity.min(held);
                self.invested -= removed * self.average_cost();
                self.quantity -= lot.quantity;
                if self.quantity <= Decimal::ZERO {
                    self.invested = Decimal::ZERO;
                }
            }
        }
    }

    fn into_holding(self, symbol: String) -> Holding {
        let average_cost = self.average_cost();
        let current_value = self.current_price.map(|price| price * self.quantity);
        Holding {
            symbol,
            name: self.name,
            quantity: self.quantity,
            average_cost,
            invested: self.invested,
            current_price: self.current_price,
            current_value,
            unrealized_gain: current_value.map(|value| value - self.invested),
            lot_count: self.lot_count,
        }
    }
}

/// Replays lots in trade order (trade date, else recording time; ties keep
/// the given order) and returns one holding per symbol, sorted by symbol.
pub fn reconstruct_holdings(lots: &[StockLot]) -> Vec<Holding> {
    let mut ordered: Vec<&StockLot> = lots.iter().collect();
    ordered.sort_by_key(|lot| (lot.effective_date(), lot.created_at));

    let mut positions: BTreeMap<String, PositionState> = BTreeMap::new();
    for lot in ordered {
        positions.entry(lot.symbol.clone()).or_default().apply(lot);
    }

    positions
        .into_iter()
        .map(|(symbol, state)| state.into_holding(symbol))
        .collect()
}

/// Holdings that still have shares.
pub fn open_holdings(lots: &[StockLot]) -> Vec<Holding> {
    reconstruct_holdings(lots)
        .into_iter()
        .filter(|h| h.quantity > Decimal::ZERO)
        .collect()
}

/// Cost basis of every open holding.
pub fn total_open_invested(lots: &[StockLot]) -> Decimal {
    open_holdings(lots).iter().map(|h| h.invested).sum()
}
