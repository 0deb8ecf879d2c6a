pub const DEFAULT_MIN_MAPPING_QUALITY: u8 = 20;
pub const DEFAULT_MIN_ALIGNMENT_SCORE: i64 = 30;
pub const DEFAULT_MIN_BASE_QUALITY: u8 = 20;
/// Reads must be strictly longer than this.
pub const DEFAULT_MIN_READ_LENGTH: usize = 25;

pub const DEFAULT_MIN_LEVEL: f64 = 0.01;
pub const DEFAULT_HOMOPLASMIC_LEVEL: f64 = 0.9;
pub const DEFAULT_CONSENSUS_LEVEL: f64 = 0.5;

/// Level above which an allele is labelled major.
pub const MAJOR_LEVEL: f64 = 0.5;

pub const DELETION_CHAR: char = 'D';

pub const VARIANTS_HEADER: &str = "SampleID\tPos\tRef\tVariant\tMajor/Minor\tVariant-Level\tCoverage-FWD\tCoverage-Rev\tCoverage-Total\tType";

/// Forward counts in upper case, reverse counts in lower case.
pub const RAW_HEADER: &str = "SampleID\tPos\tRef\tA\tC\tG\tT\tN\tDEL\ta\tc\tg\tt\tn\tdel\tINS\tCoverage-FWD\tCoverage-Rev\tCoverage-Total";
