pub mod classifier;
pub mod fetcher;
pub mod inventory;
pub mod notifier;
pub mod parser;
pub mod paths;
pub mod pruner;
pub mod reconciler;
pub mod sync;
pub mod title;
