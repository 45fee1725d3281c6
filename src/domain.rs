pub mod entities;
pub mod mock_data;
pub mod use_cases;
pub mod validation;
