use std::fmt::{self, Display};
use std::sync::Arc;

///
/// Identifier of one sample (one input unit), cheap to clone into every key.
///
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct SampleId(Arc<str>);

impl SampleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SampleId {
    fn from(value: &str) -> Self {
        SampleId(Arc::from(value))
    }
}

impl From<String> for SampleId {
    fn from(value: String) -> Self {
        SampleId(Arc::from(value))
    }
}

impl Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// Composite key of a pileup entry: sample plus 1-based reference position.
///
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct PositionKey {
    pub sample: SampleId,
    pub position: u32,
}

impl PositionKey {
    pub fn new(sample: SampleId, position: u32) -> Self {
        PositionKey { sample, position }
    }
}

impl Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sample, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_keys_order_by_sample_then_position() {
        let a = SampleId::from("a");
        let b = SampleId::from("b");
        let mut keys = vec![
            PositionKey::new(b.clone(), 1),
            PositionKey::new(a.clone(), 10),
            PositionKey::new(a.clone(), 2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                PositionKey::new(a.clone(), 2),
                PositionKey::new(a, 10),
                PositionKey::new(b, 1),
            ]
        );
    }

    #[rstest]
    fn test_display() {
        let key = PositionKey::new(SampleId::from(String::from("s1")), 16519);
        assert_eq!(key.to_string(), "s1:16519");
    }
}
