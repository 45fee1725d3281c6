use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{check_form, is_valid_symbol, present_trimmed, FormRules, ValidationFailure};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GmapsSearchQuery {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub q: Option<String>,
}

impl FormRules for GmapsSearchQuery {
    const MISSING: ValidationFailure = ValidationFailure::MissingFields {
        error: "Missing query parameter",
        message: "Vui lòng cung cấp từ khóa tìm kiếm (?q=keyword)",
    };
    const TOO_LONG: ValidationFailure = ValidationFailure::FieldTooLong {
        error: "Query too long",
        message: "Từ khóa tìm kiếm tối đa 200 ký tự",
    };

    fn has_required_fields(&self) -> bool {
        present_trimmed(&self.q)
    }
}

impl GmapsSearchQuery {
    /// The trimmed search term.
    pub fn into_term(self) -> Result<String, ValidationFailure> {
        check_form(&self)?;
        Ok(self.q.unwrap_or_default().trim().to_string())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TradeReportQuery {
    #[serde(default)]
    pub symbol: Option<String>,
}

impl FormRules for TradeReportQuery {
    const MISSING: ValidationFailure = ValidationFailure::MissingFields {
        error: "Missing symbol parameter",
        message: "Vui lòng cung cấp mã cổ phiếu (?symbol=AAPL)",
    };
    const TOO_LONG: ValidationFailure = ValidationFailure::FieldTooLong {
        error: "Invalid symbol format",
        message: "Mã cổ phiếu phải là 1-5 ký tự chữ cái",
    };

    fn has_required_fields(&self) -> bool {
        present_trimmed(&self.symbol)
    }

    fn check_format(&self) -> Result<(), ValidationFailure> {
        match self.symbol.as_deref().map(str::trim) {
            Some(symbol) if is_valid_symbol(symbol) => Ok(()),
            _ => Err(ValidationFailure::InvalidFormat {
                error: "Invalid symbol format",
                message: "Mã cổ phiếu phải là 1-5 ký tự chữ cái",
            }),
        }
    }
}

impl TradeReportQuery {
    pub fn into_symbol(self) -> Result<String, ValidationFailure> {
        check_form(&self)?;
        Ok(self.symbol.unwrap_or_default().trim().to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Business {
    pub id: &'static str,
    pub name: String,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub website: Option<&'static str>,
    pub rating: f64,
    pub reviews: u32,
    pub category: &'static str,
    pub status: &'static str,
    pub coordinates: Coordinates,
}

#[derive(Debug, Serialize)]
pub struct GmapsIntegrationStatus {
    pub google_places_api: &'static str,
    pub auto_email: &'static str,
    pub auto_sms: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GmapsSearchResponse {
    pub query: String,
    pub results: Vec<Business>,
    pub total: usize,
    pub mock: bool,
    pub timestamp: String,
    pub note: &'static str,
    pub integration_status: GmapsIntegrationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovingAverages {
    pub sma_20: f64,
    pub sma_50: f64,
    pub ema_12: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicalAnalysis {
    pub rsi: f64,
    pub macd: Macd,
    pub moving_averages: MovingAverages,
    pub support_resistance: SupportResistance,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiAnalysis {
    pub sentiment: &'static str,
    pub recommendation: &'static str,
    pub confidence_score: f64,
    pub key_factors: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub volatility: &'static str,
    pub beta: f64,
    pub var_1day: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: &'static str,
    pub sentiment: &'static str,
    /// `YYYY-MM-DD`
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeReport {
    pub symbol: String,
    pub company_name: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: String,
    pub pe_ratio: f64,
    pub technical_analysis: TechnicalAnalysis,
    pub ai_analysis: AiAnalysis,
    pub risk_assessment: RiskAssessment,
    pub recent_news: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub struct TradeIntegrationStatus {
    pub trading_api: &'static str,
    pub ai_analysis: &'static str,
    pub news_feed: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TradeReportResponse {
    pub report: TradeReport,
    pub mock: bool,
    pub timestamp: String,
    pub generated_at: String,
    pub note: &'static str,
    pub disclaimer: &'static str,
    pub integration_status: TradeIntegrationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_missing() {
        let err = GmapsSearchQuery { q: Some("   ".into()) }.into_term().unwrap_err();
        assert_eq!(err.error(), "Missing query parameter");
    }

    #[test]
    fn query_is_trimmed_and_capped() {
        let term = GmapsSearchQuery { q: Some("  phở  ".into()) }.into_term().unwrap();
        assert_eq!(term, "phở");

        let err = GmapsSearchQuery { q: Some("q".repeat(201)) }.into_term().unwrap_err();
        assert_eq!(err.error(), "Query too long");
    }

    #[test]
    fn symbol_checks() {
        assert_eq!(
            TradeReportQuery::default().into_symbol().unwrap_err().error(),
            "Missing symbol parameter"
        );
        assert_eq!(
            TradeReportQuery { symbol: Some("BRK.B".into()) }.into_symbol().unwrap_err().error(),
            "Invalid symbol format"
        );
        assert_eq!(
            TradeReportQuery { symbol: Some(" vnm ".into()) }.into_symbol().unwrap(),
            "vnm"
        );
    }
}
