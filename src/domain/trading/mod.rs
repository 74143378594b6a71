// Trade legs, charges and report rows
pub mod charges;
pub mod currency;
pub mod fee_schedule;
pub mod outcome;
pub mod record;
pub mod table;
