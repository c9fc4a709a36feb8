// Conversions from worker errors to Temporal failures

use temporalio_common::protos::temporal::api::failure::v1::Failure;

use crate::error::HandlerError;

/// Application failure for a handler error, marked non-retryable
pub(super) fn handler_failure(err: &HandlerError) -> Failure {
    Failure::application_failure(err.to_string(), true)
}
