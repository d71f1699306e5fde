use axum::Json;
use tracing::debug;

use cachette_types::api::{CalculateRequest, CalculateResponse};

use crate::error::ApiError;

/// The calculator face evaluates what the visitor types. `meval` only knows
/// arithmetic, so there is no expression that reaches anything beyond math.
pub async fn calculate(
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    Ok(Json(evaluate(&req.expression)?))
}

pub fn evaluate(expression: &str) -> Result<CalculateResponse, ApiError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(ApiError::Validation("Erreur de validation".to_string()));
    }

    let result = meval::eval_str(expression).map_err(|e| {
        debug!("rejected expression '{expression}': {e}");
        ApiError::Validation("Expression invalide".to_string())
    })?;

    if !result.is_finite() {
        return Err(ApiError::Validation("Expression invalide".to_string()));
    }

    Ok(CalculateResponse {
        result,
        display: format_result(result),
    })
}

/// Integer-like results render without a decimal point, the way a pocket
/// calculator displays them.
fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_precedence_and_parentheses() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap().display, "14");
        assert_eq!(evaluate("(2 + 3) * 4").unwrap().display, "20");
        assert_eq!(evaluate("10 / 4").unwrap().display, "2.5");
    }

    #[test]
    fn integer_like_results_drop_the_decimal_point() {
        assert_eq!(evaluate("sqrt(16)").unwrap().display, "4");
        assert_eq!(evaluate("-8 + 3").unwrap().display, "-5");
    }

    #[test]
    fn rejects_anything_that_is_not_arithmetic() {
        assert!(evaluate("").is_err());
        assert!(evaluate("   ").is_err());
        assert!(evaluate("process.exit(1)").is_err());
        assert!(evaluate("2 +").is_err());
    }

    #[test]
    fn rejects_non_finite_results() {
        assert!(evaluate("1 / 0").is_err());
    }
}
