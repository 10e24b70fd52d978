//! Trade dialog.
//!
//! Offered quantities are signed: positive buys from the trader, negative
//! sells to them. A good's quantity is always kept within
//! `-colony_count..=trader_count`.

use crate::nav::{LeafOutcome, MenuDomain};
use anyhow::Result;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Tradeable {
    pub id: String,
    pub label: String,
    pub colony_count: u32,
    pub trader_count: u32,
    /// Spoken price, already formatted by the host
    pub price: String,
}

impl Tradeable {
    pub fn clamp(&self, offered: i64) -> i32 {
        let low = (-i64::from(self.colony_count)).max(i64::from(i32::MIN));
        let high = i64::from(self.trader_count).min(i64::from(i32::MAX));
        // Both bounds fit in i32, so the cast is lossless
        offered.clamp(low, high) as i32
    }
}

pub trait TradeSession {
    fn trader_name(&self) -> String;
    fn goods(&self) -> Result<Vec<Tradeable>>;
    fn offered(&self, id: &str) -> Result<i32>;
    fn set_offered(&self, id: &str, count: i32) -> Result<()>;
    /// Spoken summary of what the deal costs or earns
    fn balance(&self) -> Result<String>;
    /// Finish the deal, returning what to tell the user
    fn accept(&self) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Quantity,
    BuyAll,
    SellAll,
    Reset,
}

impl TradeAction {
    const ALL: [TradeAction; 4] = [
        TradeAction::Quantity,
        TradeAction::BuyAll,
        TradeAction::SellAll,
        TradeAction::Reset,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeEntry {
    Good(Tradeable),
    Action(TradeAction),
    Accept,
}

pub struct TradeMenu {
    session: Rc<dyn TradeSession>,
}

impl TradeMenu {
    pub fn new(session: Rc<dyn TradeSession>) -> Self {
        Self { session }
    }

    /// Current good for a path ending in an action
    fn good<'a>(&self, path: &'a [TradeEntry]) -> Option<&'a Tradeable> {
        path.iter().rev().find_map(|entry| match entry {
            TradeEntry::Good(good) => Some(good),
            _ => None,
        })
    }

    fn offered_text(&self, id: &str) -> String {
        match self.session.offered(id) {
            Ok(0) => "no change".to_string(),
            Ok(n) if n > 0 => format!("buying {}", n),
            Ok(n) => format!("selling {}", n.unsigned_abs()),
            Err(e) => {
                tracing::warn!("Trade: could not read offer for {}: {:#}", id, e);
                "unknown".to_string()
            }
        }
    }

    fn set(&self, good: &Tradeable, offered: i64) -> Result<()> {
        let count = good.clamp(offered);
        self.session.set_offered(&good.id, count)?;
        tracing::debug!("Trade: {} offered {}", good.id, count);
        Ok(())
    }
}

impl MenuDomain for TradeMenu {
    type Entry = TradeEntry;

    fn name(&self) -> &str {
        "Trade"
    }

    fn build(&mut self, path: &[TradeEntry]) -> Result<Vec<TradeEntry>> {
        Ok(match path {
            [] => {
                let mut entries: Vec<_> = self
                    .session
                    .goods()?
                    .into_iter()
                    .map(TradeEntry::Good)
                    .collect();
                entries.push(TradeEntry::Accept);
                entries
            }
            [TradeEntry::Good(_)] => TradeAction::ALL
                .iter()
                .copied()
                .map(TradeEntry::Action)
                .collect(),
            _ => Vec::new(),
        })
    }

    fn label(&self, entry: &TradeEntry) -> String {
        match entry {
            TradeEntry::Good(good) => format!(
                "{}, {}, colony has {}, trader has {}, {}",
                good.label,
                self.offered_text(&good.id),
                good.colony_count,
                good.trader_count,
                good.price
            ),
            TradeEntry::Action(TradeAction::Quantity) => "Quantity".to_string(),
            TradeEntry::Action(TradeAction::BuyAll) => "Buy all".to_string(),
            TradeEntry::Action(TradeAction::SellAll) => "Sell all".to_string(),
            TradeEntry::Action(TradeAction::Reset) => "Reset".to_string(),
            TradeEntry::Accept => match self.session.balance() {
                Ok(balance) => format!("Accept trade with {}, {}", self.session.trader_name(), balance),
                Err(_) => format!("Accept trade with {}", self.session.trader_name()),
            },
        }
    }

    fn has_children(&self, entry: &TradeEntry) -> bool {
        matches!(entry, TradeEntry::Good(_))
    }

    fn is_adjustable(&self, entry: &TradeEntry) -> bool {
        matches!(
            entry,
            TradeEntry::Good(_) | TradeEntry::Action(TradeAction::Quantity)
        )
    }

    fn adjust(&mut self, path: &[TradeEntry], delta: i32) -> Result<LeafOutcome> {
        let good = self
            .good(path)
            .ok_or_else(|| anyhow::anyhow!(crate::nav::engine::NOT_ADJUSTABLE))?;
        let offered = self.session.offered(&good.id)?;
        self.set(good, i64::from(offered) + i64::from(delta))?;
        let message = self.offered_text(&good.id);
        Ok(LeafOutcome::stay(capitalize(&message)))
    }

    fn activate(&mut self, path: &[TradeEntry]) -> Result<LeafOutcome> {
        match path {
            [TradeEntry::Accept] => {
                let message = self.session.accept()?;
                tracing::info!("Trade with {} accepted", self.session.trader_name());
                Ok(LeafOutcome::close(message))
            }
            [TradeEntry::Good(good), TradeEntry::Action(action)] => {
                let offered = match action {
                    TradeAction::Quantity => return Ok(LeafOutcome::Stay { message: None }),
                    TradeAction::BuyAll => i64::from(good.trader_count),
                    TradeAction::SellAll => -i64::from(good.colony_count),
                    TradeAction::Reset => 0,
                };
                self.set(good, offered)?;
                Ok(LeafOutcome::back(capitalize(&self.offered_text(&good.id))))
            }
            _ => Ok(LeafOutcome::Stay { message: None }),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
