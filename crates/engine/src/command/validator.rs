use std::sync::Arc;

use async_trait::async_trait;
use graphctl_types::{ArgumentBag, ValidationOutcome};
use tracing::debug;

use crate::context::InvocationContext;
use crate::error::GraphError;

/// An async predicate over the parsed arguments of one invocation.
///
/// Validators that need the network go through `ctx` (for example
/// [`InvocationContext::get_json`]), so they share the invocation's
/// transport and cancellation. An `Err` aborts the invocation; a
/// [`ValidationOutcome::Rejected`] reports a usage error.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<ValidationOutcome, GraphError>;
}

/// Adapts a synchronous check into a [`Validator`].
pub struct FnValidator<F> {
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&ArgumentBag) -> ValidationOutcome + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&ArgumentBag) -> ValidationOutcome + Send + Sync,
{
    async fn validate(&self, _ctx: &InvocationContext, args: &ArgumentBag) -> Result<ValidationOutcome, GraphError> {
        Ok((self.check)(args))
    }
}

/// Ordered validators evaluated left to right; the first rejection wins and
/// later validators are not consulted.
#[derive(Clone, Default)]
pub struct ValidatorPipeline {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidatorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, validator: Arc<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// # Errors
    /// [`GraphError::Cancelled`] once the invocation's token fires, or the
    /// first error a validator returns.
    pub async fn run(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<ValidationOutcome, GraphError> {
        for (index, validator) in self.validators.iter().enumerate() {
            let outcome = ctx.cancellable(validator.validate(ctx, args)).await??;
            if let ValidationOutcome::Rejected(reason) = &outcome {
                debug!(validator = index, %reason, "arguments rejected");
                return Ok(outcome);
            }
        }
        Ok(ValidationOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::offline_context;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counting {
        calls: Arc<AtomicUsize>,
        outcome: ValidationOutcome,
    }

    #[async_trait]
    impl Validator for Counting {
        async fn validate(&self, _ctx: &InvocationContext, _args: &ArgumentBag) -> Result<ValidationOutcome, GraphError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }
    }

    /// Stands in for a lookup that never answers.
    struct Stalled;

    #[async_trait]
    impl Validator for Stalled {
        async fn validate(&self, _ctx: &InvocationContext, _args: &ArgumentBag) -> Result<ValidationOutcome, GraphError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(ValidationOutcome::Accepted)
        }
    }

    #[tokio::test]
    async fn first_rejection_short_circuits_the_rest() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = ValidatorPipeline::new();
        pipeline.push(Arc::new(FnValidator::new(|_: &ArgumentBag| ValidationOutcome::Accepted)));
        pipeline.push(Arc::new(FnValidator::new(|_: &ArgumentBag| ValidationOutcome::reject("first"))));
        pipeline.push(Arc::new(Counting {
            calls: later_calls.clone(),
            outcome: ValidationOutcome::reject("second"),
        }));

        let outcome = pipeline.run(&offline_context(), &ArgumentBag::new()).await.expect("validated");

        assert_eq!(outcome.reason(), Some("first"));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_pipeline_accepts() {
        let outcome = ValidatorPipeline::new()
            .run(&offline_context(), &ArgumentBag::new())
            .await
            .expect("validated");
        assert!(outcome.is_accepted());
    }

    #[tokio::test]
    async fn cancellation_interrupts_a_pending_validator() {
        let mut pipeline = ValidatorPipeline::new();
        pipeline.push(Arc::new(Stalled));
        let ctx = offline_context();
        ctx.cancellation().cancel();

        let outcome = tokio::time::timeout(Duration::from_millis(500), pipeline.run(&ctx, &ArgumentBag::new()))
            .await
            .expect("cancellation is observed without waiting for the validator");

        assert!(matches!(outcome, Err(GraphError::Cancelled)));
    }

    #[tokio::test]
    async fn validators_see_the_invocation_context() {
        struct ResourceAware;

        #[async_trait]
        impl Validator for ResourceAware {
            async fn validate(&self, ctx: &InvocationContext, _args: &ArgumentBag) -> Result<ValidationOutcome, GraphError> {
                Ok(ValidationOutcome::reject(format!("checked against {}", ctx.resource())))
            }
        }

        let mut pipeline = ValidatorPipeline::new();
        pipeline.push(Arc::new(ResourceAware));
        let outcome = pipeline.run(&offline_context(), &ArgumentBag::new()).await.expect("validated");

        assert_eq!(outcome.reason(), Some("checked against https://graph.microsoft.com"));
    }
}
