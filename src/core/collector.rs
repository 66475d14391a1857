use crate::config::NumericPolicy;
use crate::domain::model::CalculationRequest;
use crate::domain::ports::FormSource;
use crate::utils::error::{CalcError, Result};

pub const PROD_COST: &str = "prodCost";
pub const YIELD: &str = "yield";
pub const COMM_YIELD: &str = "commYield";
pub const QUALITY_CLASS: &str = "qualityClass";

/// Leading characters a browser's `parseFloat` skips: Unicode white space
/// plus the byte-order mark, minus NEL.
fn is_js_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Forced float parsing: the longest numeric prefix after leading
/// whitespace wins, trailing text is ignored, and no numeric prefix at all
/// gives NaN. `"12.5kg"` is 12.5, `" -Infinity"` is negative infinity and
/// `"1e"` is 1.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start_matches(is_js_whitespace);
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Builds a fresh request from the form on every submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCollector {
    policy: NumericPolicy,
}

impl FormCollector {
    pub fn new(policy: NumericPolicy) -> Self {
        Self { policy }
    }

    pub fn collect<F: FormSource + ?Sized>(&self, form: &F) -> Result<CalculationRequest> {
        let request = CalculationRequest {
            production_cost_ha: self.numeric_field(form, PROD_COST)?,
            yield_ha: self.numeric_field(form, YIELD)?,
            commercial_yield_pct: self.numeric_field(form, COMM_YIELD)?,
            quality_class: required_field(form, QUALITY_CLASS)?,
        };

        tracing::debug!("Collected form: {:?}", request);
        Ok(request)
    }

    fn numeric_field<F: FormSource + ?Sized>(&self, form: &F, field_id: &str) -> Result<f64> {
        let raw = required_field(form, field_id)?;
        let value = parse_float(&raw);

        if value.is_nan() {
            match self.policy {
                NumericPolicy::Reject => {
                    return Err(CalcError::InvalidNumber {
                        field: field_id.to_string(),
                        raw,
                    })
                }
                NumericPolicy::Forward => {
                    tracing::warn!("Forwarding non-numeric '{}' value {:?} as NaN", field_id, raw);
                }
            }
        }

        Ok(value)
    }
}

fn required_field<F: FormSource + ?Sized>(form: &F, field_id: &str) -> Result<String> {
    form.value(field_id).ok_or_else(|| CalcError::MissingField {
        field: field_id.to_string(),
    })
}
