//! Column layout of the exam-score tables.

pub const CLASE: &str = "Clase";
pub const NOME: &str = "Nome";
pub const NUM_INSC: &str = "NumInsc";
pub const NRO_FILHO: &str = "NroFilho";
pub const DATA_NAC: &str = "DataNac";
pub const GEO: &str = "GEO";
pub const PORT: &str = "PORT";
pub const EDU: &str = "EDU";
pub const OBJETIVAS: &str = "Objetivas";
pub const DISCURSIVA: &str = "Discursiva";
pub const TITULOS: &str = "Titulos";
pub const TOTAL: &str = "Total";

/// Columns as printed in the source document, in order.
pub const SOURCE_COLUMNS: [&str; 12] = [
    CLASE, NOME, NUM_INSC, NRO_FILHO, DATA_NAC, GEO, PORT, EDU, OBJETIVAS, DISCURSIVA, TITULOS,
    TOTAL,
];

/// Columns discarded right after renaming.
pub const DROPPED_COLUMNS: [&str; 3] = [CLASE, DISCURSIVA, TITULOS];

/// Columns of a cleaned record, in export order.
pub const OUTPUT_COLUMNS: [&str; 9] = [
    NOME, NUM_INSC, NRO_FILHO, DATA_NAC, GEO, PORT, EDU, OBJETIVAS, TOTAL,
];

/// Score columns coerced to numbers.
pub const NUMERIC_COLUMNS: [&str; 5] = [GEO, PORT, EDU, OBJETIVAS, TOTAL];

/// Marker printed in the Total column for disqualified candidates.
pub const ELIMINATED_TOKEN: &str = "Elimin.";
