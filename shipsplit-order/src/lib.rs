pub mod models;
pub mod rules;
pub mod classifier;
pub mod splitter;
pub mod orchestrator;

pub use models::{Order, LineItem};
pub use rules::SplitRules;
pub use classifier::{Classifier, SourceMix};
pub use splitter::{Splitter, SplitPair, SplitError};
pub use orchestrator::{SplitOrchestrator, NotificationOutcome};
