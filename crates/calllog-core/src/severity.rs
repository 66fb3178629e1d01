//! Classification of failures raised by wrapped calls

use std::error::Error;

use crate::types::Criticality;

/// Decides how serious a failure is
///
/// The interceptor consults exactly one policy for every failure, so an
/// allow-list of expected errors only needs a new implementation here.
pub trait SeverityPolicy: Send + Sync {
    fn classify(&self, error: &(dyn Error + 'static)) -> Criticality;
}

/// Default policy: every failure is critical
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysCritical;

impl SeverityPolicy for AlwaysCritical {
    fn classify(&self, _error: &(dyn Error + 'static)) -> Criticality {
        Criticality::Critical
    }
}

impl<F> SeverityPolicy for F
where
    F: Fn(&(dyn Error + 'static)) -> Criticality + Send + Sync,
{
    fn classify(&self, error: &(dyn Error + 'static)) -> Criticality {
        self(error)
    }
}
