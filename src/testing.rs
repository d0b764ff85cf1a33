use super::record::{read_records, Record};

/// Thirty clues, solvable by naked singles alone.
pub const WIKI: (&str, &str) = (
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
);

pub const HARD: (&str, &str) = (
    "000000000000000001001023040000500020002041600070000000004036702060050030800900060",
    "245617893638495271791823546416589327382741659579362418954136782167258934823974165",
);

pub fn sample() -> Vec<Record> {
    read_records(include_str!("../sample.csv").as_bytes()).unwrap()
}
