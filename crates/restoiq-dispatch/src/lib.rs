//! RestoIQ Dispatch: handler catalogue, task registry, dispatcher.

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod task;

pub use catalog::{HandlerCatalog, DEFAULT_ENTRYPOINT};
pub use dispatcher::Dispatcher;
pub use error::TaskError;
pub use registry::{AnalysisTask, RegistryState, TaskRegistry, TaskSpec};
pub use task::{HandlerFn, RequestArgs, TaskContext, TaskRequest, TaskResult};
