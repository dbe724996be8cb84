// kart/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps in order and drives their handlers.

use super::{ContextData, Pipeline};
use crate::error::PipelineError;
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// A step whose skip condition holds is passed over. A step with no handlers
  /// fails the run with [`PipelineError::HandlerMissing`]. The first handler error aborts
  /// the run and is returned unchanged.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<(), Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = tracing::info_span!(
        "pipeline_step",
        step_name = step_def.name,
        step_index = step_idx
      );

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(&ctx_data) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let handlers = match self.on.get(step_def.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ => {
          event!(parent: &step_span, Level::ERROR, "Step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            step_name: step_def.name.to_string(),
          }));
        }
      };

      for handler_fn in handlers {
        // The span is attached to the future, never entered across an await.
        if let Err(e) = handler_fn(ctx_data.clone()).instrument(step_span.clone()).await {
          event!(parent: &step_span, Level::DEBUG, error = %e, "Step handler failed.");
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(())
  }
}
