//! Dispatcher: key lookup plus a call-and-catch adapter around handlers.

use std::panic::{self, AssertUnwindSafe};

use restoiq_core::{FieldMap, ResultEnvelope, StatusCode};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::TaskError;
use crate::registry::{AnalysisTask, TaskRegistry};
use crate::task::{RequestArgs, TaskContext, TaskRequest, NO_ARGS};

/// Executes registered tasks. Never panics and never returns `Err`.
pub struct Dispatcher {
    registry: TaskRegistry,
    context: TaskContext,
}

impl Dispatcher {
    pub fn new(registry: TaskRegistry, context: TaskContext) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Mutable access for late registration; a locked registry still rejects it.
    pub fn registry_mut(&mut self) -> &mut TaskRegistry {
        &mut self.registry
    }

    pub fn context(&self) -> &TaskContext {
        &self.context
    }

    /// Run `service.subtask` with `params`.
    ///
    /// Unknown keys yield a 404 envelope listing the known keys. Handler
    /// errors and panics yield a 500 envelope carrying a correlation id.
    pub fn execute(
        &self,
        service: &str,
        subtask: &str,
        params: &FieldMap,
        bytes: Option<&[u8]>,
    ) -> (ResultEnvelope, StatusCode) {
        self.execute_with_args(service, subtask, params, &NO_ARGS, bytes)
    }

    /// Like [`Dispatcher::execute`], with request-level arguments alongside
    /// the extracted fields.
    pub fn execute_with_args(
        &self,
        service: &str,
        subtask: &str,
        params: &FieldMap,
        args: &RequestArgs,
        bytes: Option<&[u8]>,
    ) -> (ResultEnvelope, StatusCode) {
        let Some(task) = self.registry.get(service, subtask) else {
            warn!("Task {}.{} not found", service, subtask);
            let envelope = ResultEnvelope::error(
                service,
                subtask,
                format!("Task {}.{} not found", service, subtask),
                &self.context.envelope_version,
            )
            .with_known_tasks(self.registry.keys());
            return (envelope, StatusCode::NOT_FOUND);
        };

        debug!("Dispatching {} with {} params", task.key(), params.len());
        let request = TaskRequest {
            service,
            subtask,
            params,
            args,
            bytes,
            context: &self.context,
        };
        match call_handler(task, &request) {
            Ok(result) => result,
            Err(e) => {
                let correlation_id = Uuid::new_v4().to_string();
                error!(
                    task = %task.key(),
                    correlation_id = %correlation_id,
                    "Error executing task {}: {}",
                    task.key(),
                    e
                );
                let envelope = ResultEnvelope::error(
                    service,
                    subtask,
                    format!("Internal error: {}", e),
                    &self.context.envelope_version,
                )
                .with_correlation_id(correlation_id);
                (envelope, StatusCode::INTERNAL_ERROR)
            }
        }
    }
}

/// Invoke the handler, folding a panic into [`TaskError::Internal`].
fn call_handler(
    task: &AnalysisTask,
    request: &TaskRequest<'_>,
) -> Result<(ResultEnvelope, StatusCode), TaskError> {
    let handler = task.handler;
    match panic::catch_unwind(AssertUnwindSafe(|| handler(request))) {
        Ok(result) => result,
        Err(payload) => Err(TaskError::Internal(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("handler panicked: {}", s)
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HandlerCatalog;
    use crate::task::TaskResult;
    use restoiq_core::FieldValue;

    fn echo(req: &TaskRequest<'_>) -> TaskResult {
        let sales = req.number("total_sales").unwrap_or(0.0);
        Ok((req.success(serde_json::json!({"total_sales": sales})), StatusCode::OK))
    }

    fn failing(_req: &TaskRequest<'_>) -> TaskResult {
        Err(TaskError::Internal("division by zero".into()))
    }

    fn greet(req: &TaskRequest<'_>) -> TaskResult {
        let name = req.arg("name").unwrap_or("nobody");
        Ok((req.success(serde_json::json!({"name": name})), StatusCode::OK))
    }

    fn panicking(_req: &TaskRequest<'_>) -> TaskResult {
        panic!("stock count overflow")
    }

    fn dispatcher() -> Dispatcher {
        let catalog = HandlerCatalog::new()
            .with("tasks::kpi::sales_performance", "run", echo)
            .with("tasks::beverage::inventory", "run", panicking)
            .with("tasks::beverage::pricing", "run", failing)
            .with("tasks::menu::questions", "run", greet);
        let mut registry = TaskRegistry::new(catalog);
        registry.register("kpi", "sales_performance", "tasks::kpi::sales_performance", None);
        registry.register("beverage", "inventory", "tasks::beverage::inventory", None);
        registry.register("beverage", "pricing", "tasks::beverage::pricing", None);
        registry.register("menu", "questions", "tasks::menu::questions", None);
        registry.lock();
        Dispatcher::new(registry, TaskContext::default())
    }

    #[test]
    fn test_execute_passes_envelope_through() {
        let d = dispatcher();
        let mut params = FieldMap::new();
        params.insert_if_absent("total_sales", FieldValue::Number(50000.0));
        let (env, status) = d.execute("kpi", "sales_performance", &params, None);
        assert_eq!(status, StatusCode::OK);
        assert!(env.is_success());
        assert_eq!(env.data.unwrap()["total_sales"], 50000.0);
        assert_eq!(env.params.unwrap()["total_sales"], 50000.0);
    }

    #[test]
    fn test_unknown_task_lists_known_keys() {
        let d = dispatcher();
        let (env, status) = d.execute("kpi", "nonexistent", &FieldMap::new(), None);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!env.is_success());
        assert_eq!(env.error.as_deref(), Some("Task kpi.nonexistent not found"));
        assert_eq!(
            env.known_tasks.unwrap(),
            vec![
                "beverage.inventory",
                "beverage.pricing",
                "kpi.sales_performance",
                "menu.questions"
            ]
        );
    }

    #[test]
    fn test_args_travel_apart_from_params() {
        let d = dispatcher();
        let mut args = RequestArgs::new();
        args.insert("name".into(), " hidden stars ".into());
        let (env, status) = d.execute_with_args("menu", "questions", &FieldMap::new(), &args, None);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(env.data.unwrap()["name"], "hidden stars");
        assert_eq!(env.params.unwrap(), serde_json::json!({}));

        let (env, _) = d.execute("menu", "questions", &FieldMap::new(), None);
        assert_eq!(env.data.unwrap()["name"], "nobody");
    }

    #[test]
    fn test_handler_error_becomes_internal_error() {
        let d = dispatcher();
        let (env, status) = d.execute("beverage", "pricing", &FieldMap::new(), None);
        assert_eq!(status, StatusCode::INTERNAL_ERROR);
        assert_eq!(env.error.as_deref(), Some("Internal error: division by zero"));
        let id = env.correlation_id.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_handler_panic_is_caught() {
        let d = dispatcher();
        let (env, status) = d.execute("beverage", "inventory", &FieldMap::new(), Some(&b"a,b\n1,2"[..]));
        assert_eq!(status, StatusCode::INTERNAL_ERROR);
        assert!(env.error.unwrap().contains("stock count overflow"));
        assert!(env.correlation_id.is_some());

        // Still usable afterwards.
        let (_, status) = d.execute("kpi", "sales_performance", &FieldMap::new(), None);
        assert_eq!(status, StatusCode::OK);
    }
}
