//! Periodic producer, consumer pool and the lifecycle driver that ties them
//! to a [`BoundedQueue`](crate::queue::BoundedQueue)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pcqueue::timer::{Pipeline, PipelineConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(PipelineConfig {
//!     capacity: 10,
//!     tasks: 20,
//!     consumers: 4,
//!     period: Duration::from_millis(100),
//!     drift_correction: false,
//! })?;
//!
//! let report = pipeline.run_with(|worker, task| {
//!     println!("consumer-{} handled {}", worker, task);
//! })?;
//! assert_eq!(report.produced, report.consumed);
//! # Ok(())
//! # }
//! ```

mod consumer;
mod error;
mod producer;
mod runner;
mod task;

pub use consumer::ConsumerPool;
pub use error::{PipelineError, PipelineResult};
pub use producer::{Producer, ProducerReport};
pub use runner::{
    Pipeline, PipelineConfig, RunReport, DEFAULT_CAPACITY, DEFAULT_CONSUMERS, DEFAULT_PERIOD,
    DEFAULT_TASKS,
};
pub use task::Task;
