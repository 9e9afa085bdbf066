use super::error::VizError;

/// Rolling spectral history shared with the particle vertex stage.
///
/// Index 0 holds the most recent magnitude. Each update pushes a whole analyser
/// frame in at the front and drops the same number of entries off the back, so
/// every ring shows a decaying trail of past loudness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyHistory {
    data: Vec<u8>,
}

impl FrequencyHistory {
    pub fn new(len: usize) -> Self {
        Self { data: vec![0; len] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Shift everything right by `frame.len()` and write `frame` at the front.
    ///
    /// A frame longer than the history is rejected and leaves the buffer as it was.
    pub fn update(&mut self, frame: &[u8]) -> Result<(), VizError> {
        let n = frame.len();
        let len = self.data.len();
        if n > len {
            return Err(VizError::ConfigurationMismatch {
                expected: len,
                actual: n,
            });
        }
        if n == 0 {
            return Ok(());
        }
        self.data.copy_within(0..len - n, n);
        self.data[..n].copy_from_slice(frame);
        Ok(())
    }

    pub fn peak(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f32 / self.data.len() as f32
    }
}
