pub mod analysis;
pub mod odyssey;
pub mod round_table;
pub mod summarize;
pub mod ticket;
