use rand::Rng;
use std::time::Instant;

/// Sampled tick profiler.
///
/// - logs `begin`/`end` lines with the elapsed time for a sampled subset of ticks
/// - supports sequential spans (`span()` ends the previous span)
///
/// Sampling draws from the caller's RNG so a seeded run samples the same ticks.
pub struct LogStopwatch {
    name: String,
    started: Option<Instant>,
    span: Option<(String, Instant)>,
}

impl LogStopwatch {
    /// Sample with probability `sample_rate` in `[0, 1]`, or always with `force`.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        name: impl Into<String>,
        force: bool,
        sample_rate: f32,
    ) -> Self {
        let name = name.into();
        let sampled = force || (sample_rate > 0.0 && rng.r#gen::<f32>() <= sample_rate);
        if sampled {
            log::debug!("--------- {name} begin ---------");
        }
        Self {
            name,
            started: sampled.then(Instant::now),
            span: None,
        }
    }

    /// Start a new span, ending any previous one.
    pub fn span(&mut self, section: &str) {
        if self.started.is_none() {
            return;
        }
        self.end_span();
        self.span = Some((section.to_string(), Instant::now()));
    }

    pub fn end_span(&mut self) {
        if let Some((section, at)) = self.span.take() {
            log::debug!("  {section}: {:?}", at.elapsed());
        }
    }

    pub fn is_sampled(&self) -> bool {
        self.started.is_some()
    }
}

impl Drop for LogStopwatch {
    fn drop(&mut self) {
        self.end_span();
        if let Some(at) = self.started.take() {
            log::debug!("---------- {} end ({:?}) ----------", self.name, at.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn zero_rate_never_samples() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..32 {
            assert!(!LogStopwatch::new(&mut rng, "tick", false, 0.0).is_sampled());
        }
        assert!(LogStopwatch::new(&mut rng, "tick", true, 0.0).is_sampled());
    }
}
