use crate::{
    deck::Composition,
    pattern::MAX_PATTERN_LEN,
    types::{CARDS_PER_COLOR, PATTERN_LEN},
};
use serde::{Deserialize, Serialize};

/// Cards of each colour in a generated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub red:   usize,
    pub black: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self { red: CARDS_PER_COLOR, black: CARDS_PER_COLOR }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenneyConfig {
    pub deck:                DeckConfig,
    pub pattern_length:      usize,
    /// Decks generated per seeded batch.
    pub batch_size:          usize,
    /// Decks scored between aggregate persists.
    pub checkpoint_interval: usize,
    pub db_path:             String,
    pub results_csv:         String,
    pub matrix_json:         String,
}

impl Default for PenneyConfig {
    fn default() -> Self {
        Self {
            deck:                DeckConfig::default(),
            pattern_length:      PATTERN_LEN,
            batch_size:          10_000,
            checkpoint_interval: crate::batch::CHECKPOINT_INTERVAL,
            db_path:             "decks.db".into(),
            results_csv:         "data/results/scoring_results.csv".into(),
            matrix_json:         "data/results/matrices.json".into(),
        }
    }
}

impl PenneyConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use PenneyConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Small batches, in-memory database.
    pub fn default_test() -> Self {
        Self {
            batch_size:          50,
            checkpoint_interval: 20,
            db_path:             ":memory:".into(),
            ..Self::default()
        }
    }

    pub fn composition(&self) -> anyhow::Result<Composition> {
        Ok(Composition::binary(self.deck.red, self.deck.black)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pattern_length == 0 || self.pattern_length > MAX_PATTERN_LEN {
            anyhow::bail!("pattern_length must be in 1..={MAX_PATTERN_LEN}, got {}", self.pattern_length);
        }
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be > 0");
        }
        if self.checkpoint_interval == 0 {
            anyhow::bail!("checkpoint_interval must be > 0");
        }
        let composition = self.composition()?;
        if self.pattern_length > composition.len() {
            anyhow::bail!(
                "pattern_length {} exceeds deck length {}",
                self.pattern_length,
                composition.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let config: PenneyConfig = serde_json::from_str(r#"{ "pattern_length": 4 }"#).unwrap();
        assert_eq!(config.pattern_length, 4);
        assert_eq!(config.deck, DeckConfig::default());
        assert_eq!(config.batch_size, 10_000);
        config.validate().unwrap();
    }

    #[test]
    fn single_colour_deck_is_rejected() {
        let config = PenneyConfig {
            deck: DeckConfig { red: 52, black: 0 },
            ..PenneyConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
