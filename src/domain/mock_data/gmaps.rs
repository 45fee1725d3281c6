use rand::Rng;

use crate::entities::demo::{Business, Coordinates};

struct BusinessTemplate {
    id: &'static str,
    suffix: &'static str,
    address: &'static str,
    phone: &'static str,
    email: &'static str,
    website: Option<&'static str>,
    rating: f64,
    reviews: u32,
    category: &'static str,
    status: &'static str,
    coordinates: Coordinates,
}

const TEMPLATES: [BusinessTemplate; 3] = [
    BusinessTemplate {
        id: "mock_001",
        suffix: "Doanh nghiệp A",
        address: "123 Nguyễn Huệ, Quận 1, TP.HCM",
        phone: "+84 28 1234 5678",
        email: "contact@business-a.com",
        website: Some("https://business-a.com"),
        rating: 4.5,
        reviews: 128,
        category: "Nhà hàng",
        status: "Đang hoạt động",
        coordinates: Coordinates { lat: 10.7769, lng: 106.7009 },
    },
    BusinessTemplate {
        id: "mock_002",
        suffix: "Công ty B",
        address: "456 Lê Lợi, Quận 1, TP.HCM",
        phone: "+84 28 2345 6789",
        email: "info@company-b.vn",
        website: Some("https://company-b.vn"),
        rating: 4.2,
        reviews: 89,
        category: "Dịch vụ",
        status: "Đang hoạt động",
        coordinates: Coordinates { lat: 10.7756, lng: 106.7019 },
    },
    BusinessTemplate {
        id: "mock_003",
        suffix: "Cửa hàng C",
        address: "789 Đồng Khởi, Quận 1, TP.HCM",
        phone: "+84 28 3456 7890",
        email: "shop@store-c.com",
        website: None,
        rating: 3.8,
        reviews: 45,
        category: "Bán lẻ",
        status: "Tạm đóng cửa",
        coordinates: Coordinates { lat: 10.7743, lng: 106.7025 },
    },
];

/// Between one and three fake businesses, named after the search term.
pub fn generate_business_results<R: Rng + ?Sized>(rng: &mut R, query: &str) -> Vec<Business> {
    let count = rng.gen_range(1..=TEMPLATES.len());

    TEMPLATES[..count]
        .iter()
        .map(|t| Business {
            id: t.id,
            name: format!("{} - {}", query, t.suffix),
            address: t.address,
            phone: t.phone,
            email: t.email,
            website: t.website,
            rating: t.rating,
            reviews: t.reviews,
            category: t.category,
            status: t.status,
            coordinates: t.coordinates,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn result_count_stays_in_range_and_names_use_query() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];

        for _ in 0..200 {
            let results = generate_business_results(&mut rng, "Phở");
            assert!((1..=3).contains(&results.len()));
            assert!(results.iter().all(|b| b.name.starts_with("Phở - ")));
            seen[results.len()] = true;
        }

        assert!(seen[1] && seen[2] && seen[3]);
    }

    #[test]
    fn results_keep_template_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let results = generate_business_results(&mut rng, "x");
        assert_eq!(results[0].id, "mock_001");
    }
}
