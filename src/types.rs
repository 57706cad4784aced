/// Numeric identifier carried by every parsed record.
/// Examples: `1`, `1034`
pub type RecordId = i64;
/// Identifier for the record source a row was read from.
/// Examples: `mlb_players`, `data/mlb_players.csv`
pub type SourceId = String;
/// 1-based data-row ordinal inside a record source (header rows are not counted).
/// Example: `3` for the third data row
pub type Position = u64;
/// Ticket number handed to retrieval workers.
/// Examples: `1`, `20`
pub type TicketId = u64;
