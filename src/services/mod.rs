pub mod allocation;
pub mod analytics_service;
pub mod notification_service;
pub mod period_table;
pub mod portfolio_service;
pub mod rounding;
pub mod time_series;
pub mod view_service;
pub mod year_window;
