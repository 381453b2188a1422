//! Loaded-once advisory tables and the operations over them.
//!
//! An [`AdvisoryEngine`] owns the crop and scheme tables for its whole
//! lifetime and never mutates them, so a shared reference can serve any
//! number of concurrent requests.

use crate::assemble::{assemble_context, AssemblyRequest};
use crate::models::{CropRecord, MatchedScheme, SchemeRecord, ScoredCrop};
use crate::rank::rank_crops;
use crate::schemes::match_schemes;

#[derive(Debug, Clone, Default)]
pub struct AdvisoryEngine {
    crops: Vec<CropRecord>,
    schemes: Vec<SchemeRecord>,
}

impl AdvisoryEngine {
    pub fn new(crops: Vec<CropRecord>, schemes: Vec<SchemeRecord>) -> Self {
        Self { crops, schemes }
    }

    pub fn crops(&self) -> &[CropRecord] {
        &self.crops
    }

    pub fn schemes(&self) -> &[SchemeRecord] {
        &self.schemes
    }

    /// Top `top_n` crops for the weather. See [`rank_crops`].
    pub fn rank(&self, weather_context: &str, top_n: usize) -> Vec<ScoredCrop> {
        rank_crops(&self.crops, weather_context, top_n)
    }

    /// Schemes for `state`, tagged with `crop_names`. See [`match_schemes`].
    pub fn match_schemes(&self, crop_names: &[String], state: &str) -> Vec<MatchedScheme> {
        match_schemes(&self.schemes, crop_names, state)
    }

    /// The full prioritized context. See [`assemble_context`].
    pub fn assemble(&self, req: &AssemblyRequest<'_>) -> String {
        assemble_context(&self.crops, &self.schemes, req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::UNABLE_TO_PROCESS;
    use crate::models::SensorReadings;

    #[test]
    fn test_empty_engine_degrades() {
        let engine = AdvisoryEngine::default();
        assert!(engine.rank("rain", 10).is_empty());
        assert!(engine.match_schemes(&[], "Uttarakhand").is_empty());
        let req = AssemblyRequest::new("rain", SensorReadings::default());
        assert_eq!(engine.assemble(&req), UNABLE_TO_PROCESS);
    }

    #[test]
    fn test_engine_shared_across_threads() {
        let engine = std::sync::Arc::new(AdvisoryEngine::new(
            vec![CropRecord {
                name: "Rice".to_string(),
                suitability: "wet".to_string(),
                ..Default::default()
            }],
            Vec::new(),
        ));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.rank("monsoon", 5).len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1);
        }
    }
}
