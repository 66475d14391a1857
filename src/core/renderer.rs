use crate::domain::model::{BreakdownLine, CalculationResponse, RenderedResult};
use crate::domain::ports::ResultView;

pub const CURRENCY: &str = "€";

/// Two-decimal text with ties rounded away from zero, as a browser's
/// `toFixed(2)` does. Only multiples of 1/8 with an odd numerator sit
/// exactly halfway between two cents.
pub fn to_fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    let eighths = value.abs() * 8.0;
    if eighths < 1e15 && eighths.fract() == 0.0 && (eighths as u64) % 2 == 1 {
        let cents = (eighths as u64 * 25 + 1) / 2;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, cents / 100, cents % 100);
    }

    format!("{:.2}", value)
}

/// `€12.50`; negative amounts put the sign before the symbol.
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-{}{}", CURRENCY, to_fixed_2(-value))
    } else {
        format!("{}{}", CURRENCY, to_fixed_2(value))
    }
}

/// Explicit `+` for zero and positive amounts, `-` otherwise.
pub fn format_signed_money(value: f64) -> String {
    if value < 0.0 {
        format!("-{}{}", CURRENCY, to_fixed_2(-value))
    } else {
        format!("+{}{}", CURRENCY, to_fixed_2(value))
    }
}

/// Always `+`, whatever the sign of the amount.
pub fn format_premium(value: f64) -> String {
    format!("+{}{}", CURRENCY, to_fixed_2(value))
}

/// Shortest round-trip form, no rounding applied.
pub fn format_raw(value: f64) -> String {
    format!("{}", value)
}

/// Pure: the same response always renders to the same text.
pub fn render(response: &CalculationResponse) -> RenderedResult {
    let b = &response.breakdown;

    let breakdown = vec![
        BreakdownLine {
            label: "Base Cost + Margin:".to_string(),
            value: format_money(b.base_cost_kg + b.margin_value),
        },
        BreakdownLine {
            label: "Quality Adjustment:".to_string(),
            value: format_signed_money(b.quality_adj),
        },
        BreakdownLine {
            label: format!("Risk Premium (Yield Ratio {}):", format_raw(b.yield_ratio)),
            value: format_premium(b.risk_premium),
        },
        BreakdownLine {
            label: "Consortium Floor Price:".to_string(),
            value: format_money(b.consortium_min),
        },
        BreakdownLine {
            label: format!("Marketable Yield: {} kg/ha", format_raw(b.marketable_yield_kg)),
            value: String::new(),
        },
    ];

    RenderedResult {
        final_price: format_money(response.final_price),
        breakdown,
    }
}

/// Reveal the results region and overwrite both display regions.
pub fn present<V: ResultView + ?Sized>(view: &V, rendered: &RenderedResult) {
    view.show_results();
    view.set_final_price(&rendered.final_price);
    view.set_breakdown(&rendered.breakdown);
}
