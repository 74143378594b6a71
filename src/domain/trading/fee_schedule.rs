use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

/// Intraday equity charge rates. Percent-style rates are plain fractions
/// (0.0003 = 0.03%).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub brokerage_rate: Decimal,      // e.g., 0.0003 (0.03%) per executed order
    pub brokerage_cap: Decimal,       // e.g., 20 (₹20) per executed order
    pub stt_sell_rate: Decimal,       // e.g., 0.00025 on sell turnover
    pub exchange_txn_rate: Decimal,   // e.g., 0.0000325 on total turnover
    pub gst_rate: Decimal,            // e.g., 0.18 on brokerage + exchange + SEBI
    pub sebi_rate: Decimal,           // e.g., 0.000001 (₹10 per crore)
    pub stamp_duty_buy_rate: Decimal, // e.g., 0.00003 on buy turnover
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage_rate: Decimal::new(3, 4),      // 0.0003
            brokerage_cap: Decimal::new(20, 0),      // 20
            stt_sell_rate: Decimal::new(25, 5),      // 0.00025
            exchange_txn_rate: Decimal::new(325, 7), // 0.0000325
            gst_rate: Decimal::new(18, 2),           // 0.18
            sebi_rate: Decimal::new(1, 6),           // 0.000001
            stamp_duty_buy_rate: Decimal::new(3, 5), // 0.00003
        }
    }
}

/// Charges for one round-trip intraday trade, rounded to paise.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCharges {
    pub brokerage: Decimal,
    pub stt: Decimal,
    pub exchange_txn_charge: Decimal,
    pub gst: Decimal,
    pub sebi_charges: Decimal,
    pub stamp_duty: Decimal,
    pub total: Decimal,
    pub breakeven_points: Decimal,
}

impl FeeSchedule {
    /// Charges for buying and selling `quantity` units at the given prices.
    ///
    /// `None` when any intermediate figure overflows a `Decimal`.
    pub fn calculate(&self, buy_price: Decimal, sell_price: Decimal, quantity: u64) -> Option<ScheduledCharges> {
        let qty = Decimal::from(quantity);
        let buy_turnover = buy_price.checked_mul(qty)?;
        let sell_turnover = sell_price.checked_mul(qty)?;
        let turnover = buy_turnover.checked_add(sell_turnover)?;

        let brokerage = paise(
            self.order_brokerage(buy_turnover)?
                .checked_add(self.order_brokerage(sell_turnover)?)?,
        );
        // STT and stamp duty are charged in whole rupees.
        let stt = rupees(sell_turnover.checked_mul(self.stt_sell_rate)?);
        let exchange_txn_charge = paise(turnover.checked_mul(self.exchange_txn_rate)?);
        let sebi_charges = paise(turnover.checked_mul(self.sebi_rate)?);
        let gst = paise(
            sum(&[brokerage, exchange_txn_charge, sebi_charges])?.checked_mul(self.gst_rate)?,
        );
        let stamp_duty = rupees(buy_turnover.checked_mul(self.stamp_duty_buy_rate)?);

        let total = sum(&[brokerage, stt, exchange_txn_charge, gst, sebi_charges, stamp_duty])?;
        let breakeven_points = if qty.is_zero() {
            Decimal::ZERO
        } else {
            paise(total.checked_div(qty)?)
        };

        Some(ScheduledCharges {
            brokerage,
            stt,
            exchange_txn_charge,
            gst,
            sebi_charges,
            stamp_duty,
            total,
            breakeven_points,
        })
    }

    fn order_brokerage(&self, order_turnover: Decimal) -> Option<Decimal> {
        Some(order_turnover.checked_mul(self.brokerage_rate)?.min(self.brokerage_cap))
    }
}

fn sum(values: &[Decimal]) -> Option<Decimal> {
    values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

fn paise(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn rupees(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
