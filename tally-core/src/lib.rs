//! tally-core: transaction types, feature extraction, and the online classifier

pub mod classifier;
pub mod features;
pub mod ledger;
pub mod transaction;

pub use classifier::{OnlineClassifier, TrainingExample, MIN_CORPUS_FOR_GUESS};
pub use features::{extract, FeatureSet};
pub use ledger::Ledger;
pub use transaction::Transaction;
