//! tally-finance: category registry, ledger store, and the interactive
//! correction session that ties them to the classifier.

pub mod error;
pub mod ledger_store;
pub mod registry;
pub mod session;

pub use error::{Result, TallyError};
pub use ledger_store::LedgerStore;
pub use registry::CategoryRegistry;
pub use session::{Response, Session, SessionOptions, SessionOutcome};
