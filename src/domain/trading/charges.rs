use crate::domain::errors::QuoteError;
use crate::domain::trading::currency::parse_currency;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Decimal places of the reported brokerage percentage.
pub const PERCENTAGE_DP: u32 = 3;

/// Allowed gap between the service's total and the sum of its components.
const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Charge fields exactly as the fee calculator displays them.
///
/// Field names follow the calculator's element ids. `None` means the service
/// did not render that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    #[serde(rename = "intra_brokerage")]
    pub brokerage: Option<String>,
    #[serde(rename = "intra_stt")]
    pub stt: Option<String>,
    #[serde(rename = "intra_etc")]
    pub exchange_txn_charge: Option<String>,
    #[serde(rename = "intra_st")]
    pub gst: Option<String>,
    #[serde(rename = "sebi")]
    pub sebi_charges: Option<String>,
    #[serde(rename = "stamp_duty")]
    pub stamp_duty: Option<String>,
    #[serde(rename = "intra_total")]
    pub total_charges: Option<String>,
    #[serde(rename = "intra_breakeven")]
    pub breakeven_points: Option<String>,
}

/// One decoded charge: the display text and its numeric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeField {
    pub display: String,
    pub amount: Decimal,
}

impl ChargeField {
    fn decode(field: &'static str, raw: &Option<String>) -> Result<Self, QuoteError> {
        let display = raw.as_deref().ok_or(QuoteError::MissingField { field })?;
        let amount = parse_currency(display).map_err(|source| QuoteError::Decode { field, source })?;
        Ok(Self {
            display: display.to_string(),
            amount,
        })
    }
}

/// Cost breakdown of one trade leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeBreakdown {
    pub brokerage: ChargeField,
    pub stt: ChargeField,
    pub exchange_txn_charge: ChargeField,
    pub gst: ChargeField,
    pub sebi_charges: ChargeField,
    pub stamp_duty: ChargeField,
    /// Total as reported by the service (also written as the restated total).
    pub total_charges: ChargeField,
    pub breakeven_points: ChargeField,
    /// `100 × components / turnover`, rounded half-up to [`PERCENTAGE_DP`].
    pub brokerage_percentage: Decimal,
}

impl ChargeBreakdown {
    /// Decodes every field and derives the brokerage percentage.
    ///
    /// Fails on a missing or malformed field, or when `turnover` is not
    /// strictly positive.
    pub fn assemble(raw: &RawQuote, turnover: Decimal) -> Result<Self, QuoteError> {
        if turnover <= Decimal::ZERO {
            return Err(QuoteError::ZeroTurnover { turnover });
        }

        let brokerage = ChargeField::decode("intra_brokerage", &raw.brokerage)?;
        let stt = ChargeField::decode("intra_stt", &raw.stt)?;
        let exchange_txn_charge = ChargeField::decode("intra_etc", &raw.exchange_txn_charge)?;
        let gst = ChargeField::decode("intra_st", &raw.gst)?;
        let sebi_charges = ChargeField::decode("sebi", &raw.sebi_charges)?;
        let stamp_duty = ChargeField::decode("stamp_duty", &raw.stamp_duty)?;
        let total_charges = ChargeField::decode("intra_total", &raw.total_charges)?;
        let breakeven_points = ChargeField::decode("intra_breakeven", &raw.breakeven_points)?;

        let components = sum_amounts(&[
            &brokerage,
            &stt,
            &exchange_txn_charge,
            &gst,
            &sebi_charges,
            &stamp_duty,
        ])
        .ok_or(QuoteError::Overflow {
            figure: "charge components",
        })?;

        let gap = components.checked_sub(total_charges.amount).map(|d| d.abs());
        if gap.is_none_or(|g| g > TOTAL_TOLERANCE) {
            warn!(
                "Charge components sum to {} but service total is {}",
                components, total_charges.amount
            );
        }

        let brokerage_percentage =
            brokerage_percentage(components, turnover).ok_or(QuoteError::Overflow {
                figure: "brokerage percentage",
            })?;

        Ok(Self {
            brokerage,
            stt,
            exchange_txn_charge,
            gst,
            sebi_charges,
            stamp_duty,
            total_charges,
            breakeven_points,
            brokerage_percentage,
        })
    }

    /// Sum of the six charge components, `None` on overflow.
    pub fn components_total(&self) -> Option<Decimal> {
        sum_amounts(&[
            &self.brokerage,
            &self.stt,
            &self.exchange_txn_charge,
            &self.gst,
            &self.sebi_charges,
            &self.stamp_duty,
        ])
    }

    /// Percentage as the report displays it, e.g. `"0.244%"`.
    pub fn percentage_display(&self) -> String {
        format!("{}%", self.brokerage_percentage.normalize())
    }
}

/// `round(100 × charges / turnover, 3)`, half-up. `None` when the quotient
/// overflows or `turnover` is zero.
pub fn brokerage_percentage(charges: Decimal, turnover: Decimal) -> Option<Decimal> {
    charges
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(turnover)
        .map(|p| p.round_dp_with_strategy(PERCENTAGE_DP, RoundingStrategy::MidpointAwayFromZero))
}

fn sum_amounts(fields: &[&ChargeField]) -> Option<Decimal> {
    fields
        .iter()
        .try_fold(Decimal::ZERO, |acc, f| acc.checked_add(f.amount))
}
