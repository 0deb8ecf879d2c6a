use thiserror::Error;

#[derive(Error, Debug)]
pub enum VariantFileError {
    #[error("Variant file is empty or lacks the expected header")]
    MissingHeader,

    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: cannot parse {column} from `{value}`")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: unknown variant type code {code}")]
    UnknownType { line: usize, code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VariantFileError>;
