use crate::domain::{DeadLetterQueue, Error};

/// Reports rejected input as warnings on the tracing subscriber.
#[derive(Default, Debug)]
pub struct TracingDlq {}

impl DeadLetterQueue for TracingDlq {
    fn report(&self, error: &Error) {
        tracing::warn!(%error, "rejected seed row");
    }
}
