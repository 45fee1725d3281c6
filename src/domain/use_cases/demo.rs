use chrono::{FixedOffset, Utc};

use crate::{
    entities::demo::{
        GmapsIntegrationStatus, GmapsSearchQuery, GmapsSearchResponse, TradeIntegrationStatus,
        TradeReportQuery, TradeReportResponse,
    },
    mock_data::{generate_business_results, generate_trade_report},
    settings::IntegrationKeys,
    utils::latency::MockLatency,
    validation::ValidationFailure,
};

/// Demo data endpoints. Always mocked; configured API keys only change the
/// explanatory fields.
pub struct DemoHandler {
    latency: MockLatency,
    keys: IntegrationKeys,
}

impl DemoHandler {
    pub fn new(latency: MockLatency, keys: IntegrationKeys) -> Self {
        DemoHandler { latency, keys }
    }

    pub async fn gmaps_search(&self, query: GmapsSearchQuery) -> Result<GmapsSearchResponse, ValidationFailure> {
        let term = query.into_term()?;
        let has_api = self.keys.places_configured();
        if has_api {
            tracing::info!("Google Places API key found, serving mock data anyway");
        }

        self.latency.simulate().await;

        let results = generate_business_results(&mut rand::thread_rng(), &term);

        Ok(GmapsSearchResponse {
            total: results.len(),
            query: term,
            results,
            mock: true,
            timestamp: Utc::now().to_rfc3339(),
            note: if has_api {
                "Google Places API key detected but mock mode active for safety"
            } else {
                "Using mock data - configure GOOGLE_PLACES_API_KEY to enable real search"
            },
            integration_status: GmapsIntegrationStatus {
                google_places_api: if has_api { "configured_but_mocked" } else { "not_configured" },
                auto_email: if self.keys.sendgrid_configured() { "configured" } else { "not_configured" },
                auto_sms: if self.keys.twilio_configured() { "configured" } else { "not_configured" },
            },
        })
    }

    pub async fn trade_report(&self, query: TradeReportQuery) -> Result<TradeReportResponse, ValidationFailure> {
        let symbol = query.into_symbol()?;
        let has_api = self.keys.trading_configured();
        if has_api {
            tracing::info!("Trading API key found, serving mock data anyway");
        }

        self.latency.simulate().await;

        let now = Utc::now();
        let report = generate_trade_report(&mut rand::thread_rng(), &symbol, now);

        Ok(TradeReportResponse {
            report,
            mock: true,
            timestamp: now.to_rfc3339(),
            generated_at: vietnam_local(now),
            note: if has_api {
                "Trading API key detected but mock mode active for safety"
            } else {
                "Using mock data - configure TRADING_API_KEY to enable real market data"
            },
            disclaimer: "Đây là dữ liệu mô phỏng. Không sử dụng cho quyết định đầu tư thực tế.",
            integration_status: TradeIntegrationStatus {
                trading_api: if has_api { "configured_but_mocked" } else { "not_configured" },
                ai_analysis: "mock_enabled",
                news_feed: "mock_enabled",
            },
        })
    }
}

/// `H:MM:SS D/M/YYYY` in UTC+7, the way Vietnamese locales print it.
fn vietnam_local(now: chrono::DateTime<Utc>) -> String {
    let ict = FixedOffset::east_opt(7 * 3600).map_or_else(|| now.fixed_offset(), |tz| now.with_timezone(&tz));
    ict.format("%-H:%M:%S %-d/%-m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn keys_everywhere() -> IntegrationKeys {
        IntegrationKeys {
            google_places_api_key: Some("places".into()),
            trading_api_key: Some("trading".into()),
            sendgrid_api_key: Some("sg".into()),
            ..IntegrationKeys::default()
        }
    }

    #[tokio::test]
    async fn gmaps_stays_mock_with_keys() {
        let handler = DemoHandler::new(MockLatency::none(), keys_everywhere());

        let response = handler
            .gmaps_search(GmapsSearchQuery { q: Some(" coffee ".into()) })
            .await
            .unwrap();

        assert!(response.mock);
        assert_eq!(response.query, "coffee");
        assert_eq!(response.total, response.results.len());
        assert_eq!(response.integration_status.google_places_api, "configured_but_mocked");
        assert_eq!(response.integration_status.auto_email, "configured");
    }

    #[tokio::test]
    async fn trade_report_stays_mock_with_keys() {
        let handler = DemoHandler::new(MockLatency::none(), keys_everywhere());

        let response = handler
            .trade_report(TradeReportQuery { symbol: Some("aapl".into()) })
            .await
            .unwrap();

        assert!(response.mock);
        assert_eq!(response.report.symbol, "AAPL");
        assert_eq!(response.integration_status.trading_api, "configured_but_mocked");
    }

    #[tokio::test]
    async fn invalid_symbol_is_rejected() {
        let handler = DemoHandler::new(MockLatency::none(), IntegrationKeys::default());

        let err = handler
            .trade_report(TradeReportQuery { symbol: Some("123".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.error(), "Invalid symbol format");
    }

    #[test]
    fn generated_at_uses_vietnam_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 20, 5, 9).unwrap();
        assert_eq!(vietnam_local(now), "3:05:09 2/3/2025");
    }
}
