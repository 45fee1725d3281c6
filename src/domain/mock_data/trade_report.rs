use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{
    entities::demo::{
        AiAnalysis, Macd, MovingAverages, NewsItem, RiskAssessment, SupportResistance, TechnicalAnalysis,
        TradeReport,
    },
    mock_data::round_to,
};

const KEY_FACTORS: [&str; 4] = [
    "Báo cáo tài chính quý gần đây tích cực",
    "Xu hướng thị trường tổng thể ổn định",
    "Khối lượng giao dịch tăng mạnh",
    "Chỉ số kỹ thuật cho tín hiệu tích cực",
];

/// Three-way pick: `first` with probability `p_first`, otherwise `second` with
/// probability `p_second`, otherwise `third`.
fn tiered<R: Rng + ?Sized>(
    rng: &mut R,
    p_first: f64,
    first: &'static str,
    p_second: f64,
    second: &'static str,
    third: &'static str,
) -> &'static str {
    if rng.gen_bool(p_first) {
        first
    } else if rng.gen_bool(p_second) {
        second
    } else {
        third
    }
}

fn days_ago<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, max_days: i64) -> String {
    let back = rng.gen_range(0..max_days * 24 * 60 * 60 * 1000);
    (now - Duration::milliseconds(back)).format("%Y-%m-%d").to_string()
}

/// A plausible-looking report for `symbol`. Prices are rounded to two
/// decimals and every news item is dated within the week before `now`.
pub fn generate_trade_report<R: Rng + ?Sized>(rng: &mut R, symbol: &str, now: DateTime<Utc>) -> TradeReport {
    let symbol = symbol.to_uppercase();

    let base_price = rng.gen_range(100.0..1100.0);
    let change = rng.gen_range(-10.0..10.0);
    let change_percent = change / base_price * 100.0;

    let technical_analysis = TechnicalAnalysis {
        rsi: round_to(rng.gen_range(0.0..100.0), 1),
        macd: Macd {
            value: round_to(rng.gen_range(-1.0..1.0), 3),
            signal: round_to(rng.gen_range(-1.0..1.0), 3),
            histogram: round_to(rng.gen_range(-0.5..0.5), 3),
        },
        moving_averages: MovingAverages {
            sma_20: round_to(base_price * rng.gen_range(0.95..1.05), 2),
            sma_50: round_to(base_price * rng.gen_range(0.9..1.1), 2),
            ema_12: round_to(base_price * rng.gen_range(0.98..1.02), 2),
        },
        support_resistance: SupportResistance {
            support: round_to(base_price * 0.9, 2),
            resistance: round_to(base_price * 1.1, 2),
        },
    };

    let factor_count = rng.gen_range(2..=KEY_FACTORS.len());
    let ai_analysis = AiAnalysis {
        sentiment: tiered(rng, 0.5, "Tích cực", 0.7, "Trung tính", "Tiêu cực"),
        recommendation: tiered(rng, 0.4, "MUA", 0.7, "GIỮ", "BÁN"),
        confidence_score: round_to(rng.gen_range(60.0..100.0), 1),
        key_factors: KEY_FACTORS[..factor_count].to_vec(),
    };

    let risk_assessment = RiskAssessment {
        volatility: tiered(rng, 0.3, "Cao", 0.6, "Trung bình", "Thấp"),
        beta: round_to(rng.gen_range(0.5..2.5), 2),
        var_1day: round_to(base_price * 0.02 * rng.gen_range(0.0..1.0), 2),
        sharpe_ratio: round_to(rng.gen_range(0.5..2.5), 2),
    };

    let recent_news = vec![
        NewsItem {
            title: format!("{} công bố kết quả kinh doanh quý mới", symbol),
            summary: "Doanh thu tăng trưởng mạnh so với cùng kỳ năm trước",
            sentiment: "positive",
            date: days_ago(rng, now, 7),
        },
        NewsItem {
            title: format!("Phân tích: Triển vọng {} trong quý tới", symbol),
            summary: "Các chuyên gia đưa ra dự báo về hiệu suất cổ phiếu",
            sentiment: "neutral",
            date: days_ago(rng, now, 3),
        },
    ];

    TradeReport {
        company_name: format!("{} Corporation", symbol),
        current_price: round_to(base_price + change, 2),
        previous_close: round_to(base_price, 2),
        change: round_to(change, 2),
        change_percent: round_to(change_percent, 2),
        volume: rng.gen_range(1_000_000..11_000_000),
        market_cap: format!("{:.1}B", rng.gen_range(50.0..550.0)),
        pe_ratio: round_to(rng.gen_range(5.0..35.0), 2),
        technical_analysis,
        ai_analysis,
        risk_assessment,
        recent_news,
        symbol,
    }
}
