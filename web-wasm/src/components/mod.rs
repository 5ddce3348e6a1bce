pub mod header;
pub mod controls;
pub mod vehicle_table;
pub mod loading_indicator;
