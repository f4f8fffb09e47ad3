use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::key::StructuredKey;
use crate::traits::DependencyResolver;

/// Invokes the resolution function carried by the key itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactoryResolver;

impl DependencyResolver for FactoryResolver {
    fn resolve(&self, container: &Container, key: &StructuredKey) -> DiResult<Instance> {
        key.call_resolve(container).unwrap_or_else(|| {
            Err(DiError::InvalidStructuredKey {
                kind: key.kind().to_string(),
                reason: "factory key without a resolve function",
            })
        })
    }
}
